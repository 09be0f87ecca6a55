//! # Rule errors
//!
//! Login rules report failures with a small, Feathers-style error type.
//! - every error has a status code, a name and a kebab-cased class name
//! - it rides inside `anyhow::Error` so hooks can use `?` freely
//! - the transport (server, pipeline) decides how to render it; `to_json`
//!   gives the usual `{ name, message, code, className }` payload

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::{json, Value};

/// Result type returned by rule hooks.
pub type RuleResult<T> = std::result::Result<T, AnyError>;

/// Error classes a login rule can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,   // 400
    Forbidden,    // 403
    GeneralError, // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

/// A structured rule error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct RuleError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<Value>,
    pub source: Option<AnyError>,
}

impl RuleError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    pub fn from_anyhow(err: &AnyError) -> Option<&RuleError> {
        err.downcast_ref::<RuleError>()
    }

    /// Keep a `RuleError` as is, wrap anything else as `GeneralError`.
    pub fn normalize(err: AnyError) -> RuleError {
        match err.downcast::<RuleError>() {
            Ok(rule) => rule,
            Err(other) => {
                RuleError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// Copy without the inner `source`, safe to hand back to a login client.
    pub fn sanitize_for_client(&self) -> RuleError {
        RuleError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        base
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Return early from a hook with a `RuleError`.
#[macro_export]
macro_rules! bail_rule {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::RuleError::$ctor($msg).into_anyhow());
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::RuleError::$ctor(format!($fmt, $($arg)*)).into_anyhow());
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deny() -> RuleResult<()> {
        bail_rule!(forbidden, "Access denied");
    }

    #[test]
    fn forbidden_survives_anyhow_round_trip() {
        let err = deny().unwrap_err();
        let rule = RuleError::from_anyhow(&err).expect("must be RuleError");
        assert_eq!(rule.kind, ErrorKind::Forbidden);
        assert_eq!(rule.code(), 403);
        assert_eq!(rule.to_string(), "Forbidden (403): Access denied");
    }

    #[test]
    fn foreign_errors_normalize_to_general_error() {
        let rule = RuleError::normalize(anyhow::anyhow!("boom"));
        assert_eq!(rule.kind, ErrorKind::GeneralError);
        assert_eq!(rule.message, "boom");
        assert!(rule.source.is_some());
        assert!(rule.sanitize_for_client().source.is_none());
    }

    #[test]
    fn json_payload_has_feathers_shape() {
        let body = RuleError::bad_request("Invalid email")
            .with_data(json!({"field": "email"}))
            .to_json();
        assert_eq!(body["name"], "BadRequest");
        assert_eq!(body["code"], 400);
        assert_eq!(body["className"], "bad-request");
        assert_eq!(body["data"]["field"], "email");
    }
}
