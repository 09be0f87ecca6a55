// Domain allowlist hook.

use anyhow::Result;
use async_trait::async_trait;
use dog_rules::{RuleConfigSnapshot, RuleContext, RuleError, RuleHook, RuleMeta};
use tracing::{debug, info, warn};

use crate::check::{evaluate_with, Decision};
use crate::error::DomainCheckError;
use crate::options::DomainCheckOptions;

pub const RULE_NAME: &str = "check-domains-against-connection-aliases";

/// Denies logins whose email domain is not one of the connection's aliases.
///
/// Connections without a `tenant_domain` are left alone.
#[derive(Clone, Debug, Default)]
pub struct DomainAllowlistHook {
    options: DomainCheckOptions,
}

impl DomainAllowlistHook {
    pub fn new(options: DomainCheckOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &RuleConfigSnapshot) -> Result<Self> {
        let options = DomainCheckOptions::from_config(config).map_err(|e| {
            RuleError::general_error(format!("Invalid {} configuration", RULE_NAME))
                .with_source(e.into())
                .into_anyhow()
        })?;
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &DomainCheckOptions {
        &self.options
    }
}

#[async_trait]
impl RuleHook for DomainAllowlistHook {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            name: RULE_NAME,
            category: "access control",
            description: "Only allow logins from email domains configured on the connection",
        }
    }

    async fn run(&self, ctx: &RuleContext) -> Result<()> {
        let decision = evaluate_with(&ctx.principal, &ctx.policy, &self.options).map_err(|e| {
            warn!(
                connection = %ctx.connection,
                tenant = %ctx.tenant.0,
                error = %e,
                "domain allowlist could not evaluate login"
            );
            let message = match e {
                DomainCheckError::MissingEmail => "Email is required",
                _ => "Invalid email address",
            };
            RuleError::bad_request(message).with_source(e.into()).into_anyhow()
        })?;

        match decision {
            Decision::Allow => {
                debug!(
                    connection = %ctx.connection,
                    tenant = %ctx.tenant.0,
                    enforced = ctx.policy.enforces_domains(),
                    "domain allowlist passed"
                );
                Ok(())
            }
            Decision::Deny(reason) => {
                info!(
                    connection = %ctx.connection,
                    tenant = %ctx.tenant.0,
                    "domain allowlist denied login"
                );
                Err(RuleError::forbidden(reason).into_anyhow())
            }
        }
    }
}
