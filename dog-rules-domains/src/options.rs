// Domain check options.

use std::str::FromStr;

use dog_rules::RuleConfigSnapshot;

use crate::error::{DomainCheckError, DomainCheckResult};

pub const EXTRACTION_KEY: &str = "domain_allowlist.extraction";

/// Which part of an email address is compared against the aliases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DomainExtraction {
    /// Segment right after the first `@`. `bob@sub@a.com` yields `sub`.
    #[default]
    AfterFirstAt,
    /// Segment after the last `@`. `bob@sub@a.com` yields `a.com`.
    AfterLastAt,
}

impl FromStr for DomainExtraction {
    type Err = DomainCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "after_first_at" => Ok(Self::AfterFirstAt),
            "last" | "after_last_at" => Ok(Self::AfterLastAt),
            other => Err(DomainCheckError::UnknownExtraction(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainCheckOptions {
    pub extraction: DomainExtraction,
}

impl DomainCheckOptions {
    pub fn new(extraction: DomainExtraction) -> Self {
        Self { extraction }
    }

    /// Read options from config, falling back to defaults for unset keys.
    pub fn from_config(config: &RuleConfigSnapshot) -> DomainCheckResult<Self> {
        let extraction = match config.get(EXTRACTION_KEY) {
            Some(raw) => raw.parse()?,
            None => DomainExtraction::default(),
        };
        Ok(Self { extraction })
    }
}
