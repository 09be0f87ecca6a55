//! Connection domain allowlist rule for DogRS logins.
//!
//! A connection with a `tenant_domain` only accepts users whose email domain
//! is listed in its `domain_aliases`. Connections without one accept everyone.

pub mod check;
pub mod error;
pub mod hook;
pub mod options;

pub use check::{evaluate, evaluate_with, extract_email_domain, Decision, ACCESS_DENIED};
pub use error::{DomainCheckError, DomainCheckResult};
pub use hook::{DomainAllowlistHook, RULE_NAME};
pub use options::{DomainCheckOptions, DomainExtraction, EXTRACTION_KEY};
