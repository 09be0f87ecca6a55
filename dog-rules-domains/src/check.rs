// Connection domain allowlist check.

use dog_rules::{ConnectionPolicy, Principal};
use tracing::debug;

use crate::error::{DomainCheckError, DomainCheckResult};
use crate::options::{DomainCheckOptions, DomainExtraction};

/// Message returned on a domain mismatch. It never names the allowed domains.
pub const ACCESS_DENIED: &str = "Access denied";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    fn denied() -> Self {
        Decision::Deny(ACCESS_DENIED.to_string())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Lowercased domain part of `email`.
///
/// With [`DomainExtraction::AfterFirstAt`] anything after a second `@` is
/// dropped, so `bob@sub@a.com` yields `sub`.
pub fn extract_email_domain(email: &str, mode: DomainExtraction) -> DomainCheckResult<String> {
    let domain = match mode {
        DomainExtraction::AfterFirstAt => email.split('@').nth(1),
        DomainExtraction::AfterLastAt => email.rsplit_once('@').map(|(_, domain)| domain),
    };

    domain
        .map(str::to_lowercase)
        .ok_or(DomainCheckError::MalformedEmail)
}

/// [`evaluate_with`] using default options.
pub fn evaluate(principal: &Principal, policy: &ConnectionPolicy) -> DomainCheckResult<Decision> {
    evaluate_with(principal, policy, &DomainCheckOptions::default())
}

/// Decide whether `principal` may log in through a connection with `policy`.
///
/// Connections without a tenant domain allow everyone, even principals
/// without a usable email.
pub fn evaluate_with(
    principal: &Principal,
    policy: &ConnectionPolicy,
    options: &DomainCheckOptions,
) -> DomainCheckResult<Decision> {
    if !policy.enforces_domains() {
        return Ok(Decision::Allow);
    }

    let email = principal.email().ok_or(DomainCheckError::MissingEmail)?;
    let domain = extract_email_domain(email, options.extraction)?;

    let matched = policy.domain_aliases.iter().any(|alias| *alias == domain);
    // Only the domain is logged; the local part stays out of logs.
    debug!(domain = %domain, matched, "checked email domain against connection aliases");

    if matched {
        Ok(Decision::Allow)
    } else {
        Ok(Decision::denied())
    }
}
