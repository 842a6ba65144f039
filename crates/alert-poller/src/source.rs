//! Alert Sources

use alert_classifier::AlertRecord;
use std::future::Future;
use tracing::{debug, info};

use crate::{FetchError, PollerConfig, PollerError};

/// Something the poller can fetch the current alert list from
pub trait AlertSource: Send + Sync + 'static {
    /// Fetch the full alert list, in backend order
    fn fetch_alerts(&self) -> impl Future<Output = Result<Vec<AlertRecord>, FetchError>> + Send;
}

/// Alert source backed by the HTTP alert endpoint
#[derive(Debug, Clone)]
pub struct HttpAlertSource {
    client: reqwest::Client,
    url: String,
}

impl HttpAlertSource {
    /// Create a source for the configured backend
    pub fn new(config: &PollerConfig) -> Result<Self, PollerError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PollerError::Client(e.to_string()))?;

        let url = config.alerts_url();
        info!("Alert source targeting {}", url);

        Ok(Self { client, url })
    }

    /// Endpoint this source polls
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AlertSource for HttpAlertSource {
    fn fetch_alerts(&self) -> impl Future<Output = Result<Vec<AlertRecord>, FetchError>> + Send {
        async move {
            let response = self.client.get(&self.url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = response.bytes().await?;
            let alerts: Vec<AlertRecord> = serde_json::from_slice(&body)?;
            debug!("Fetched {} alerts from {}", alerts.len(), self.url);

            Ok(alerts)
        }
    }
}
