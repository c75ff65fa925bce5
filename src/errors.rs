//! Error types for the itermon widgets
//!
//! Provides a single error enum shared by the status line, the progress
//! widgets, and the abort watcher.

use thiserror::Error;

/// Main error type for terminal feedback operations
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Terminal write or flush failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw-mode setup or teardown failures
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad widget parameters (zero window, negative tolerance, ...)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for feedback operations
pub type Result<T> = std::result::Result<T, FeedbackError>;

/// Convert anyhow errors to FeedbackError
impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeedbackError::InvalidParameter("window must be >= 2".to_string());
        assert!(err.to_string().contains("window must be >= 2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: FeedbackError = io_err.into();
        assert!(matches!(err, FeedbackError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: FeedbackError = anyhow::anyhow!("bad interval").into();
        assert!(matches!(err, FeedbackError::Config(_)));
    }
}
