//! Poll State

use alert_classifier::{aggregate, AlertRecord, Stats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FetchError;

/// What the dashboard is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// First fetch has not resolved yet
    InitialLoading,
    /// Latest fetch succeeded with at least one alert
    DisplayingData,
    /// Latest fetch failed; last good alert list is still shown
    DisplayingErrorWithStaleData,
    /// Latest fetch succeeded with no alerts
    DisplayingEmpty,
}

/// Dashboard poll state, owned by the poller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollState {
    /// Alerts from the last successful fetch, in server order
    pub alerts: Vec<AlertRecord>,
    /// True until the first fetch resolves
    pub loading: bool,
    /// Message of the latest failed fetch
    pub error: Option<String>,
    /// Time of the last successful fetch
    pub last_update: Option<DateTime<Utc>>,
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            alerts: Vec::new(),
            loading: true,
            error: None,
            last_update: None,
        }
    }
}

impl PollState {
    /// Apply the outcome of one fetch attempt
    pub fn apply(&mut self, outcome: Result<Vec<AlertRecord>, FetchError>, now: DateTime<Utc>) {
        match outcome {
            Ok(alerts) => {
                self.alerts = alerts;
                self.error = None;
                self.last_update = Some(now);
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
    }

    /// Per-tier counts of the current alerts
    pub fn stats(&self) -> Stats {
        aggregate(&self.alerts)
    }

    /// Which view the dashboard should show for this state
    pub fn display_state(&self) -> DisplayState {
        if self.loading {
            DisplayState::InitialLoading
        } else if self.error.is_some() {
            DisplayState::DisplayingErrorWithStaleData
        } else if self.alerts.is_empty() {
            DisplayState::DisplayingEmpty
        } else {
            DisplayState::DisplayingData
        }
    }
}
