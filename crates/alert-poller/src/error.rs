//! Poller Error Types

use thiserror::Error;

/// Failure of a single poll attempt.
///
/// The display string is what the dashboard shows next to the stale data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Backend answered with a non-2xx status
    #[error("Failed to fetch: {0}")]
    Status(u16),

    /// Connection, timeout, or body transfer failure
    #[error("Error: {0}")]
    Transport(String),

    /// Body was not a JSON array of alerts
    #[error("Error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Status(_) => "status",
            FetchError::Transport(_) => "transport",
            FetchError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Errors raised while setting up the poller
#[derive(Debug, Error)]
pub enum PollerError {
    /// Base URL does not form a valid endpoint
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Poll interval must be positive
    #[error("Poll interval must be greater than zero")]
    ZeroInterval,

    /// Polling needs a tokio runtime to run on
    #[error("No tokio runtime available to run the poller")]
    NoRuntime,

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}
