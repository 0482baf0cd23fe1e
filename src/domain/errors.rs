//! Domain error types
//!
//! This module defines the error hierarchy for Refiner. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Refiner error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RefinerError {
    /// The input document does not match the input schema
    #[error("Schema validation error: {0}")]
    SchemaValidation(#[from] SchemaValidationError),

    /// A timestamp or date value could not be interpreted
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Input schema violation
///
/// Carries the path of the offending field (e.g. `entry[0].resource.birthDate`)
/// so callers can attribute the failure. `<root>` marks a document-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at {path}: {message}")]
pub struct SchemaValidationError {
    /// Path to the offending field
    pub path: String,

    /// Description of the violation
    pub message: String,
}

impl SchemaValidationError {
    /// Creates a new schema validation error
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() {
                "<root>".to_string()
            } else {
                path
            },
            message: message.into(),
        }
    }
}

/// Timestamp parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Epoch seconds outside the representable calendar range
    #[error("epoch timestamp out of range: {0}")]
    OutOfRange(i64),

    /// String that matches none of the accepted formats
    #[error("unparsable timestamp: '{0}'")]
    Unparsable(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for RefinerError {
    fn from(err: std::io::Error) -> Self {
        RefinerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RefinerError {
    fn from(err: serde_json::Error) -> Self {
        RefinerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RefinerError {
    fn from(err: toml::de::Error) -> Self {
        RefinerError::Configuration(format!("TOML parse error: {err}"))
    }
}
