//! # Rule configuration
//!
//! A plain string key/value store, the same shape DogRS uses for app
//! settings. Rules read a [`RuleConfigSnapshot`] once when they are built.
//!
//! ```rust
//! use dog_rules::RuleConfig;
//!
//! let mut config = RuleConfig::new();
//! config.set("domain_allowlist.extraction", "last");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get("domain_allowlist.extraction"), Some("last"));
//! ```
//!
//! ## Environment overrides
//! [`RuleConfig::load_env`] copies variables that start with a prefix:
//!
//! ```bash
//! export DOGRULES__DOMAIN_ALLOWLIST__EXTRACTION=last
//! ```
//!
//! becomes `domain_allowlist.extraction = last`.

use std::collections::HashMap;

use tracing::debug;

#[derive(Debug, Default)]
pub struct RuleConfig {
    values: HashMap<String, String>,
}

impl RuleConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Load `PREFIX__A__B=value` pairs from the process environment as `a.b`.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    /// Same as [`load_env`](Self::load_env) over an explicit variable list.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}__", prefix.trim_end_matches('_'));
        for (key, value) in vars {
            let Some(stripped) = key.strip_prefix(&prefix) else {
                continue;
            };
            if stripped.is_empty() {
                continue;
            }
            let normalized = stripped.to_lowercase().replace("__", ".");
            debug!(key = %normalized, "rule config override from environment");
            self.set(normalized, value);
        }
    }

    pub fn snapshot(&self) -> RuleConfigSnapshot {
        RuleConfigSnapshot::new(self.values.clone())
    }
}

/// Read-only copy of a [`RuleConfig`].
#[derive(Debug, Clone, Default)]
pub struct RuleConfigSnapshot {
    map: HashMap<String, String>,
}

impl RuleConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }
}
