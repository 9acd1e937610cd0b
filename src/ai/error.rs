//! Failure taxonomy for generation requests.
//!
//! Every failure renders as a single human-readable message; nothing is
//! retried automatically.

use thiserror::Error;

/// Category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    HostUnreachable,
    TimedOut,
    Offline,
    Other,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Transport-level failure before any HTTP status was received
    #[error("{message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// Non-2xx HTTP response
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    /// 2xx response whose body did not contain the expected fields
    #[error("Failed to parse response: {raw_body}")]
    Parse { raw_body: String },

    /// Malformed endpoint URL; unreachable with the built-in endpoint
    #[error("Invalid endpoint URL: {0}")]
    InvalidConfiguration(String),
}

impl NetworkErrorKind {
    /// Human-readable description matching the kind, used as the surfaced
    /// error message.
    pub fn describe(&self, detail: &str) -> String {
        match self {
            Self::HostUnreachable => {
                "Cannot connect to server. Please check your internet connection.".to_string()
            }
            Self::TimedOut => "Request timed out. Please try again.".to_string(),
            Self::Offline => "No internet connection. Please check your network.".to_string(),
            Self::Other => format!("Network error: {}", detail),
        }
    }
}
