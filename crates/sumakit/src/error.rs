//! Error types for SUSE Manager API operations.
//!
//! Errors are categorized so callers can tell a failed round trip apart from
//! a malformed response, an empty lookup, or a guard that refused to mutate.

use crate::types::SystemId;
use std::fmt;

/// Result type alias for SUSE Manager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection failure or a non-success HTTP status.
    Transport,
    /// The response body was not the JSON we expected.
    Decode,
    /// A lookup returned no result where one was expected.
    NotFound,
    /// A workflow guard failed, so no mutating call was made.
    Precondition,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transport => "Request to SUSE Manager failed",
            Self::Decode => "Unexpected response from SUSE Manager",
            Self::NotFound => "Object not found",
            Self::Precondition => "Precondition not met",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Transport => "Check the server URL, your credentials and the session cookie",
            Self::Decode => "Verify the server runs a compatible API version",
            Self::NotFound => "Verify the hostname or name is registered in SUSE Manager",
            Self::Precondition => "Check that the system belongs to the expected network",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the SUSE Manager API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if the server answered.
        status: Option<u16>,
    },

    /// Invalid response from API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// No system is registered under the hostname.
    #[error("system not found: {0}")]
    SystemNotFound(String),

    /// The server returned no network details for the system.
    #[error("no network information for system {0}")]
    NetworkNotFound(SystemId),

    /// The system's IP is outside the network the caller required.
    #[error("system {hostname} ({ip}) is not in network {network}")]
    NotInNetwork {
        /// Hostname the workflow was asked to act on.
        hostname: String,
        /// IP reported by the server.
        ip: String,
        /// Network the IP was checked against.
        network: String,
    },
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// HTTP status carried by the error, when the server answered with one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http { .. } => ErrorCategory::Transport,
            Error::InvalidResponse(_) => ErrorCategory::Decode,
            Error::SystemNotFound(_) => ErrorCategory::NotFound,
            Error::NetworkNotFound(_) => ErrorCategory::NotFound,
            Error::NotInNetwork { .. } => ErrorCategory::Precondition,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            ureq::Error::Json(e) => Self::InvalidResponse(e.to_string()),
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
