//! Per-tier Alert Statistics

use serde::Serialize;

use crate::{AlertRecord, SeverityTier};

/// Alert counts by severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl Stats {
    /// Count for a single tier
    pub fn count(&self, tier: SeverityTier) -> usize {
        match tier {
            SeverityTier::Low => self.low,
            SeverityTier::Medium => self.medium,
            SeverityTier::High => self.high,
            SeverityTier::Critical => self.critical,
        }
    }

    fn record(&mut self, tier: SeverityTier) {
        self.total += 1;
        match tier {
            SeverityTier::Low => self.low += 1,
            SeverityTier::Medium => self.medium += 1,
            SeverityTier::High => self.high += 1,
            SeverityTier::Critical => self.critical += 1,
        }
    }
}

/// Compute total and per-tier counts in a single pass
pub fn aggregate(alerts: &[AlertRecord]) -> Stats {
    alerts.iter().fold(Stats::default(), |mut stats, alert| {
        stats.record(alert.tier());
        stats
    })
}
