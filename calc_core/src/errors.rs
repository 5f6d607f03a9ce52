//! # Error Types
//!
//! Structured error types for calc_core. Every calculator validates its own
//! inputs and fails fast with one of these variants, so callers can show a
//! precise message or branch on [`CalcError::error_code`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_principal(principal: f64) -> CalcResult<()> {
//!     if principal <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "principal".to_string(),
//!             value: principal.to_string(),
//!             reason: "Principal must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by any consumer.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A required field is empty or absent
    #[error("{field} is required")]
    MissingField { field: String },

    /// A field does not parse as a finite number
    #[error("{field} must be a valid number (got '{value}')")]
    InvalidNumber { field: String, value: String },

    /// A parsed value violates a domain precondition
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A categorical selector (unit, currency, mode, calculator) is not recognised
    #[error("Unknown {kind}: '{key}'")]
    UnknownKey { kind: String, key: String },

    /// Configuration file could not be read or is inconsistent
    #[error("Config error: '{path}' - {reason}")]
    ConfigError { path: String, reason: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidNumber error
    pub fn invalid_number(field: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::InvalidNumber {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an UnknownKey error
    pub fn unknown_key(kind: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::UnknownKey {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending input field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            CalcError::MissingField { field }
            | CalcError::InvalidNumber { field, .. }
            | CalcError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidNumber { .. } => "INVALID_NUMBER",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownKey { .. } => "UNKNOWN_KEY",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
