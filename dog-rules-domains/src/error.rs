use thiserror::Error;

pub type DomainCheckResult<T> = Result<T, DomainCheckError>;

/// Inputs the domain check cannot evaluate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainCheckError {
    #[error("User has no email address")]
    MissingEmail,

    #[error("Email address has no '@' separator")]
    MalformedEmail,

    #[error("Unknown domain extraction mode: {0}")]
    UnknownExtraction(String),
}
