//! Poller Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::PollerError;

/// Backend used when no override is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path of the alert list endpoint
const ALERTS_PATH: &str = "/api/alerts";

/// Configuration for the alert poller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Backend base URL
    pub base_url: String,
    /// Interval between poll attempts in milliseconds (default: 3000)
    pub interval_ms: u64,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            interval_ms: 3000,
            request_timeout_ms: 10_000,
        }
    }
}

impl PollerConfig {
    /// Default configuration against a given backend
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Full URL of the alert list endpoint
    pub fn alerts_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ALERTS_PATH)
    }

    /// Time between poll attempts
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Deadline for a single fetch
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Check the configuration before the poller is built
    pub fn validate(&self) -> Result<(), PollerError> {
        if self.interval_ms == 0 {
            return Err(PollerError::ZeroInterval);
        }

        let url = self.alerts_url();
        reqwest::Url::parse(&url).map_err(|e| PollerError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}
