//! Error types for SKX

use thiserror::Error;

/// Result type alias for SKX operations
pub type Result<T> = std::result::Result<T, SkxError>;

/// Main error type for the shared crate
#[derive(Error, Debug)]
pub enum SkxError {
    /// A value is well-formed but not acceptable, e.g. a reversed date range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Text could not be parsed into the expected type
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SkxError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
