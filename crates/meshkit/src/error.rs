//! Error types for meshStack operations.
//!
//! A missing building block shows up either as a lookup miss or as a 404;
//! [`Error::is_not_found`] covers both.

use thiserror::Error;

/// Errors that can occur while talking to the meshStack API.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed or returned an unexpected status.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message
        message: String,
        /// HTTP status code if the server answered
        status: Option<u16>,
    },

    /// Response body could not be decoded
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// No building block with the given display name
    #[error("building block not found: {0}")]
    BuildingBlockNotFound(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Error::Http {
            message: message.into(),
            status,
        }
    }

    /// HTTP status carried by the error, when the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the server answered but the object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::BuildingBlockNotFound(_)) || self.status() == Some(404)
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Error::http(format!("HTTP {code}"), Some(code)),
            ureq::Error::Json(e) => Error::InvalidResponse(e.to_string()),
            other => Error::http(other.to_string(), None),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidResponse(err.to_string())
    }
}

/// Result type for meshStack operations
pub type Result<T> = std::result::Result<T, Error>;
