//! Alert Classification
//!
//! Provides the alert record model, severity tier mapping, and the
//! aggregate statistics shown on the dashboard.

mod model;
mod stats;
mod tier;

pub use model::AlertRecord;
pub use stats::{aggregate, Stats};
pub use tier::{classify, SeverityTier};
