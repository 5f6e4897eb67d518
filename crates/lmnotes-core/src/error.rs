//! Error types for LMNotes.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using LMNotes' Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for LMNotes operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Notebook not found
    #[error("Notebook not found: {0}")]
    NotebookNotFound(Uuid),

    /// Source not found
    #[error("Source not found: {0}")]
    SourceNotFound(Uuid),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Uploaded file has a MIME type outside the supported set
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Uploaded file exceeds the size limit
    #[error("File too large: {size} bytes (limit {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Agent HTTP call failed (non-2xx status, network error, or timeout)
    #[error("Agent error: {0}")]
    Agent(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Agent(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_notebook_not_found() {
        let id = Uuid::nil();
        let err = Error::NotebookNotFound(id);
        assert_eq!(err.to_string(), format!("Notebook not found: {}", id));
    }

    #[test]
    fn test_error_display_source_not_found() {
        let id = Uuid::new_v4();
        let err = Error::SourceNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_error_display_unsupported_type() {
        let err = Error::UnsupportedType("image/png".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: image/png");
    }

    #[test]
    fn test_error_display_payload_too_large() {
        let err = Error::PayloadTooLarge {
            size: 11_000_000,
            max: 10_485_760,
        };
        assert_eq!(
            err.to_string(),
            "File too large: 11000000 bytes (limit 10485760)"
        );
    }

    #[test]
    fn test_error_display_agent() {
        let err = Error::Agent("upload returned 500".to_string());
        assert_eq!(err.to_string(), "Agent error: upload returned 500");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("DATABASE_URL is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: DATABASE_URL is not set"
        );
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty title".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty title");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
