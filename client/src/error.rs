//! Error types for the publish client.

use std::path::PathBuf;

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Errors that can occur while submitting updates.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Certificate file could not be read or parsed.
    #[error("certificate '{path}': {message}")]
    Certificate { path: PathBuf, message: String },

    /// HTTP request failed (connection, TLS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Index node answered with a non-success status.
    #[error("index node returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PublishError {
    /// Returns the HTTP status if the index node rejected the update.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            PublishError::Status { status, .. } => Some(*status),
            PublishError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PublishError::Http(e) if e.is_timeout())
    }
}
