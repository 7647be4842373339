//! Error types for the medal standings API client.
//!
//! Every failure is classified into a [`FailureKind`], which the setup flow
//! maps to a user-facing error code.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, transport, timeout or non-200 status.
    ConnectionFailure,
    /// Body is not JSON or lacks the medal standings key.
    InvalidResponseShape,
    /// Anything else.
    Unknown,
}

impl FailureKind {
    /// Error code surfaced by the setup form.
    pub fn error_code(self) -> &'static str {
        match self {
            FailureKind::ConnectionFailure => "cannot_connect",
            FailureKind::InvalidResponseShape => "invalid_data",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_code())
    }
}

/// Errors that can occur while fetching the medal standings.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered with something other than 200
    #[error("API returned status {status}")]
    Status { status: u16 },

    /// DNS, TLS, connection reset or body read failure
    #[error("Failed to connect to API: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded total timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Body is not JSON or is missing `medalStandings`
    #[error("Invalid API response structure: {reason}")]
    InvalidResponse { reason: String },

    /// Coordinator shut down before a payload was cached
    #[error("Refresh cancelled by shutdown")]
    Cancelled,

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {source}")]
    ClientInit {
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Status { .. } => FailureKind::ConnectionFailure,
            FetchError::Transport { .. } => FailureKind::ConnectionFailure,
            FetchError::Timeout { .. } => FailureKind::ConnectionFailure,
            FetchError::InvalidResponse { .. } => FailureKind::InvalidResponseShape,
            FetchError::Cancelled => FailureKind::Unknown,
            FetchError::ClientInit { .. } => FailureKind::Unknown,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.kind().error_code()
    }
}
