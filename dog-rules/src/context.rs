//! Inputs handed to login rules.
//!
//! The pipeline builds one [`RuleContext`] per login attempt. Rules only
//! borrow it; nothing here outlives the attempt.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::RuleError;

/// Tenant the login belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(pub String);

/// The authenticating user.
///
/// Only the attributes rules look at are modelled. Unknown profile fields are
/// ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Principal {
    #[serde(default)]
    pub email: Option<String>,
}

impl Principal {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn from_profile(profile: &Value) -> Result<Self, RuleError> {
        serde_json::from_value(profile.clone()).map_err(|e| {
            RuleError::bad_request("Invalid user profile").with_source(anyhow::Error::new(e))
        })
    }
}

/// Options of the identity connection used for the login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionPolicy {
    /// Presence switches domain enforcement on. The value itself is not compared.
    pub tenant_domain: Option<String>,
    /// Lowercase email domains allowed to log in through this connection.
    pub domain_aliases: Vec<String>,
}

impl ConnectionPolicy {
    pub fn new(tenant_domain: Option<&str>, domain_aliases: &[&str]) -> Self {
        Self {
            tenant_domain: tenant_domain.map(str::to_string),
            domain_aliases: domain_aliases.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse the connection options document (`tenant_domain`, `domain_aliases`).
    ///
    /// `tenant_domain` is read by truthiness: `null`, `false`, `0` and `""`
    /// leave the connection unrestricted. `domain_aliases` is only validated
    /// when the connection is restricted; `null` means no aliases and
    /// non-string entries never match.
    pub fn from_connection_options(options: &Value) -> Result<Self, RuleError> {
        let Some(map) = options.as_object() else {
            return Err(RuleError::bad_request("Invalid connection options"));
        };

        let tenant_domain = map.get("tenant_domain").and_then(tenant_domain_flag);
        let domain_aliases = parse_aliases(map.get("domain_aliases"));

        let domain_aliases = match (&tenant_domain, domain_aliases) {
            (_, Ok(aliases)) => aliases,
            (None, Err(_)) => Vec::new(),
            (Some(_), Err(e)) => return Err(e),
        };

        Ok(Self {
            tenant_domain,
            domain_aliases,
        })
    }

    /// An empty `tenant_domain` counts as unset.
    pub fn tenant_domain(&self) -> Option<&str> {
        self.tenant_domain.as_deref().filter(|d| !d.is_empty())
    }

    pub fn enforces_domains(&self) -> bool {
        self.tenant_domain().is_some()
    }
}

fn tenant_domain_flag(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn parse_aliases(value: Option<&Value>) -> Result<Vec<String>, RuleError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()),
        Some(_) => Err(RuleError::bad_request("Invalid connection options")
            .with_data(json!({ "field": "domain_aliases" }))),
    }
}

/// Everything a rule sees for one login attempt.
#[derive(Debug, Clone)]
pub struct RuleContext {
    pub tenant: TenantId,
    pub connection: String,
    pub principal: Principal,
    pub policy: ConnectionPolicy,
}

impl RuleContext {
    pub fn new(
        tenant: impl Into<String>,
        connection: impl Into<String>,
        principal: Principal,
        policy: ConnectionPolicy,
    ) -> Self {
        Self {
            tenant: TenantId(tenant.into()),
            connection: connection.into(),
            principal,
            policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    #[test]
    fn connection_options_without_aliases_parse_as_empty() {
        let policy =
            ConnectionPolicy::from_connection_options(&json!({"tenant_domain": "exampleco"}))
                .unwrap();
        assert_eq!(policy.tenant_domain(), Some("exampleco"));
        assert!(policy.domain_aliases.is_empty());
    }

    #[test]
    fn unrelated_connection_options_are_ignored() {
        let policy = ConnectionPolicy::from_connection_options(&json!({
            "signInEndpoint": "https://idp.exampleco.com/sso",
            "domain_aliases": ["exampleco.com"]
        }))
        .unwrap();
        assert!(!policy.enforces_domains());
        assert_eq!(policy.domain_aliases, vec!["exampleco.com".to_string()]);
    }

    #[test]
    fn empty_tenant_domain_does_not_enforce() {
        let policy = ConnectionPolicy::new(Some(""), &["a.com"]);
        assert_eq!(policy.tenant_domain(), None);
        assert!(!policy.enforces_domains());
    }

    #[test]
    fn null_options_leave_connection_unrestricted() {
        let policy = ConnectionPolicy::from_connection_options(&json!({
            "tenant_domain": null,
            "domain_aliases": null
        }))
        .unwrap();
        assert!(!policy.enforces_domains());
        assert!(policy.domain_aliases.is_empty());
    }

    #[test]
    fn odd_shapes_are_tolerated_when_unrestricted() {
        for options in [
            json!({"domain_aliases": "a.com"}),
            json!({"tenant_domain": false}),
            json!({"tenant_domain": 0, "domain_aliases": {"a": 1}}),
            json!({"tenant_domain": "", "domain_aliases": 7}),
        ] {
            let policy = ConnectionPolicy::from_connection_options(&options).unwrap();
            assert!(!policy.enforces_domains(), "{options}");
            assert!(policy.domain_aliases.is_empty(), "{options}");
        }
    }

    #[test]
    fn truthy_non_string_tenant_domain_enforces() {
        let policy = ConnectionPolicy::from_connection_options(&json!({
            "tenant_domain": true,
            "domain_aliases": ["a.com", 42, null, "b.com"]
        }))
        .unwrap();
        assert!(policy.enforces_domains());
        assert_eq!(policy.domain_aliases, vec!["a.com".to_string(), "b.com".to_string()]);
    }

    #[test]
    fn restricted_connection_with_null_aliases_has_none() {
        let policy = ConnectionPolicy::from_connection_options(&json!({
            "tenant_domain": "exampleco",
            "domain_aliases": null
        }))
        .unwrap();
        assert!(policy.enforces_domains());
        assert!(policy.domain_aliases.is_empty());
    }

    #[test]
    fn non_object_options_are_bad_request() {
        let err = ConnectionPolicy::from_connection_options(&json!(["exampleco"])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[test]
    fn wrongly_shaped_aliases_are_bad_request() {
        let err = ConnectionPolicy::from_connection_options(&json!({
            "tenant_domain": "x",
            "domain_aliases": "a.com"
        }))
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[test]
    fn principal_reads_email_from_profile() {
        let p = Principal::from_profile(&json!({
            "user_id": "samlp|alice",
            "email": "alice@exampleco.com",
            "email_verified": true
        }))
        .unwrap();
        assert_eq!(p.email(), Some("alice@exampleco.com"));

        let anonymous = Principal::from_profile(&json!({"user_id": "x"})).unwrap();
        assert_eq!(anonymous.email(), None);
    }
}
