//! Dashboard Configuration

use alert_poller::{PollerConfig, DEFAULT_BASE_URL};
use config::{Config, Environment};
use serde::Deserialize;

use crate::DashboardError;

/// Prefix of the environment override (`SIEM_API_URL`)
pub const ENV_PREFIX: &str = "SIEM";

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Backend base URL the alert list is fetched from
    pub api_url: String,
}

impl DashboardConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, DashboardError> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from a given environment source, falling back to the local backend
    pub fn from_env(env: Environment) -> Result<Self, DashboardError> {
        let settings = Config::builder()
            .set_default("api_url", DEFAULT_BASE_URL)?
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Poller settings for this backend
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig::with_base_url(self.api_url.clone())
    }
}
