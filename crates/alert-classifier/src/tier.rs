//! Severity Tier Mapping

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the MEDIUM tier
const MEDIUM_THRESHOLD: f64 = 4.0;
/// Lower bound of the HIGH tier
const HIGH_THRESHOLD: f64 = 6.0;
/// Lower bound of the CRITICAL tier
const CRITICAL_THRESHOLD: f64 = 8.0;

/// Severity tier derived from a numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    /// severity < 4
    Low,
    /// 4 <= severity < 6
    Medium,
    /// 6 <= severity < 8
    High,
    /// severity >= 8
    Critical,
}

impl SeverityTier {
    /// All tiers, lowest first
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::Low,
        SeverityTier::Medium,
        SeverityTier::High,
        SeverityTier::Critical,
    ];

    /// Map a severity score to its tier.
    ///
    /// Boundaries belong to the higher tier. Scores below zero fall into
    /// LOW, scores above ten into CRITICAL, and NaN into LOW since no
    /// threshold comparison holds for it.
    pub fn classify(severity: f64) -> Self {
        if severity >= CRITICAL_THRESHOLD {
            SeverityTier::Critical
        } else if severity >= HIGH_THRESHOLD {
            SeverityTier::High
        } else if severity >= MEDIUM_THRESHOLD {
            SeverityTier::Medium
        } else {
            SeverityTier::Low
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Low => "LOW",
            SeverityTier::Medium => "MEDIUM",
            SeverityTier::High => "HIGH",
            SeverityTier::Critical => "CRITICAL",
        }
    }

    /// Color family used to highlight the tier
    pub fn color_name(&self) -> &'static str {
        match self {
            SeverityTier::Low => "green",
            SeverityTier::Medium => "yellow",
            SeverityTier::High => "orange",
            SeverityTier::Critical => "red",
        }
    }

    /// Hex color used by the render layer
    pub fn color(&self) -> &'static str {
        match self {
            SeverityTier::Low => "#10b981",
            SeverityTier::Medium => "#eab308",
            SeverityTier::High => "#f59e0b",
            SeverityTier::Critical => "#ef4444",
        }
    }

    /// Icon shown next to the alert name
    pub fn icon(&self) -> &'static str {
        match self {
            SeverityTier::Low => "✅",
            SeverityTier::Medium => "⚡",
            SeverityTier::High => "⚠️",
            SeverityTier::Critical => "🚨",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a severity score to its tier
pub fn classify(severity: f64) -> SeverityTier {
    SeverityTier::classify(severity)
}
