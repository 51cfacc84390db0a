//! Error types for the SKX CLI
//!
//! Every variant carries a message written for the operator, with a hint on what to
//! check next.

use skx_common::SkxError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// The remote service answered with a failure status or envelope code
    #[error("Remote service error: {0}. Check the access token and company code.")]
    Remote(String),

    /// Transport-level failure talking to the remote service
    #[error("Network request failed: {0}. Check your internet connection and the service URL.")]
    Http(#[from] reqwest::Error),

    /// Source enumeration returned no branches
    #[error("No branches found for company '{0}'. Check the company code and token permissions.")]
    NoSources(String),

    /// Caller-supplied input is missing or invalid
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Configuration is missing or unreadable
    #[error("Configuration error: {0}. Run 'skx config show' to inspect the stored settings.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// The spreadsheet could not be written
    #[error("Failed to write spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Interactive prompt failed for a reason other than the user cancelling
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl CliError {
    /// Create a remote service error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attach the failing page number to a remote failure
    pub fn on_page(self, page: u32) -> Self {
        match self {
            CliError::Remote(msg) => CliError::Remote(format!("page {} failed: {}", page, msg)),
            CliError::Http(err) => CliError::Remote(format!("page {} failed: {}", page, err)),
            other => other,
        }
    }

    /// Whether the failure came from the remote service or the network path to it
    pub fn is_remote(&self) -> bool {
        matches!(self, CliError::Remote(_) | CliError::Http(_))
    }
}

impl From<SkxError> for CliError {
    fn from(err: SkxError) -> Self {
        match err {
            SkxError::Validation(msg) | SkxError::Parse(msg) => CliError::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_classification() {
        assert!(CliError::remote("code 401").is_remote());
        assert!(!CliError::validation("bad range").is_remote());
        assert!(!CliError::NoSources("acme".into()).is_remote());
    }

    #[test]
    fn test_on_page_keeps_remote_class() {
        let err = CliError::remote("code 500").on_page(3);
        assert!(err.is_remote());
        assert!(matches!(&err, CliError::Remote(msg) if msg == "page 3 failed: code 500"));

        let err = CliError::validation("bad range").on_page(3);
        assert!(matches!(err, CliError::Validation(msg) if msg == "bad range"));
    }

    #[test]
    fn test_common_validation_maps_to_validation() {
        let err: CliError = SkxError::validation("start after end").into();
        assert!(matches!(err, CliError::Validation(msg) if msg == "start after end"));

        let err: CliError = SkxError::parse("not a date").into();
        assert!(matches!(err, CliError::Validation(_)));
    }
}
