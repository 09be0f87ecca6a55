use std::sync::Arc;

use anyhow::Result;

use crate::context::RuleContext;

/// Descriptor a rule publishes about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMeta {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

/// A unit of login-time logic.
///
/// `Ok(())` lets the login continue. An `Err` stops it; rules put a
/// [`RuleError`](crate::errors::RuleError) inside so the pipeline can tell a
/// denial from a malformed request.
#[async_trait::async_trait]
pub trait RuleHook: Send + Sync {
    fn meta(&self) -> RuleMeta;

    async fn run(&self, ctx: &RuleContext) -> Result<()>;
}

pub type SharedRuleHook = Arc<dyn RuleHook>;
