//! Dashboard Error Types

use alert_poller::PollerError;
use thiserror::Error;

/// Errors that can occur while bringing up the dashboard
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Poller could not be created
    #[error("Poller error: {0}")]
    Poller(#[from] PollerError),

    /// Metrics recorder could not be installed
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Logging subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// Server socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
