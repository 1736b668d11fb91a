//! Error types for Podcastr.

use thiserror::Error;

/// Result type alias using Podcastr's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Podcastr.
#[derive(Error, Debug)]
pub enum Error {
    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Network error: {0}")]
    Network(String),

    // Episode API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Episode not found: {0}")]
    NotFound(String),

    // Audio errors
    #[error("Audio decode error: {0}")]
    AudioDecode(String),

    #[error("Audio output error: {0}")]
    AudioOutput(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// HTTP-specific errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed with status {status}: {message}")]
    StatusError { status: u16, message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Returns true if this error is retryable.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Http(HttpError::ConnectionFailed(_) | HttpError::Timeout) => {
                true
            }
            Self::Http(HttpError::StatusError { status, .. }) => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the remote source reported a missing resource.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Http(HttpError::StatusError { status: 404, .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        assert!(Error::Network("test".into()).is_retryable());
        assert!(Error::Http(HttpError::Timeout).is_retryable());
        assert!(Error::Http(HttpError::StatusError {
            status: 503,
            message: String::new(),
        })
        .is_retryable());
        assert!(!Error::Http(HttpError::StatusError {
            status: 404,
            message: String::new(),
        })
        .is_retryable());
        assert!(!Error::InvalidArgument("test".into()).is_retryable());
    }

    #[test]
    fn test_not_found() {
        assert!(Error::NotFound("ep-1".into()).is_not_found());
        assert!(Error::Http(HttpError::StatusError {
            status: 404,
            message: "missing".into(),
        })
        .is_not_found());
        assert!(!Error::Parse("bad".into()).is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = Error::Api("test error".into());
        assert_eq!(err.to_string(), "API error: test error");
    }
}
