//! Dashboard View Model
//!
//! Flattens the poll state into what the browser renders: per-alert
//! tier styling, the stats cards, the error banner, and the empty panel.

use alert_classifier::{AlertRecord, SeverityTier, Stats};
use alert_poller::{DisplayState, PollState};
use serde::Serialize;
use serde_json::{Map, Value};

/// Shown when there is nothing to display after the first fetch
pub const EMPTY_HINT: &str =
    "No alerts detected. Run the replay script to generate demo alerts: python3 tools/replay_to_collector.py";

/// One alert card
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    /// 1-based position in server order
    pub index: usize,
    pub name: String,
    pub severity: f64,
    pub tier: SeverityTier,
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enriched: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
}

impl AlertView {
    fn new(index: usize, alert: &AlertRecord) -> Self {
        let tier = alert.tier();
        Self {
            index,
            name: alert.name.clone(),
            severity: alert.severity,
            tier,
            label: tier.label(),
            color: tier.color(),
            icon: tier.icon(),
            enriched: alert.enrichment().cloned(),
            evidence: alert.evidence().cloned(),
        }
    }
}

/// Full dashboard snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// "Syncing..." until the first fetch resolves, then "Live"
    pub status: &'static str,
    /// RFC 3339 time of the last successful fetch
    pub last_update: Option<String>,
    pub display_state: DisplayState,
    pub stats: Stats,
    pub error: Option<String>,
    pub alerts: Vec<AlertView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_hint: Option<&'static str>,
}

impl DashboardView {
    /// Build the view for the current poll state
    pub fn build(state: &PollState) -> Self {
        let alerts = state
            .alerts
            .iter()
            .enumerate()
            .map(|(i, alert)| AlertView::new(i + 1, alert))
            .collect();

        Self {
            status: if state.loading { "Syncing..." } else { "Live" },
            last_update: state.last_update.map(|t| t.to_rfc3339()),
            display_state: state.display_state(),
            stats: state.stats(),
            error: state.error.clone(),
            alerts,
            empty_hint: (!state.loading && state.alerts.is_empty()).then_some(EMPTY_HINT),
        }
    }
}
