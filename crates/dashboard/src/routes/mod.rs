//! HTTP Routes

pub mod dashboard;
pub mod metrics;
