//! dog-rules: framework-agnostic core for DogRS login rules.

pub mod config;
pub mod context;
pub mod errors;
pub mod hooks;

pub use config::{RuleConfig, RuleConfigSnapshot};
pub use context::{ConnectionPolicy, Principal, RuleContext, TenantId};
pub use errors::{ErrorKind, RuleError, RuleResult};
pub use hooks::{RuleHook, RuleMeta, SharedRuleHook};
