//! Alert Record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::SeverityTier;

/// A single security alert as produced by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Rule name that produced the alert
    pub name: String,
    /// Severity score (0-10 expected, not enforced)
    pub severity: f64,
    /// Threat intelligence attached by the enrichment pipeline
    #[serde(default)]
    pub enriched: Option<Map<String, Value>>,
    /// Raw evidence that triggered the rule
    #[serde(default)]
    pub evidence: Option<Value>,
}

impl AlertRecord {
    /// Create an alert with no enrichment or evidence
    pub fn new(name: impl Into<String>, severity: f64) -> Self {
        Self {
            name: name.into(),
            severity,
            enriched: None,
            evidence: None,
        }
    }

    /// Severity tier of this alert
    pub fn tier(&self) -> SeverityTier {
        SeverityTier::classify(self.severity)
    }

    /// Enrichment data, only when there is something to show
    pub fn enrichment(&self) -> Option<&Map<String, Value>> {
        self.enriched.as_ref().filter(|map| !map.is_empty())
    }

    /// Evidence payload, if the backend supplied one
    pub fn evidence(&self) -> Option<&Value> {
        self.evidence.as_ref().filter(|value| !value.is_null())
    }
}
