//! Alert Poller
//!
//! Periodically fetches the alert list from the backend and keeps the
//! single dashboard poll state up to date:
//! - Immediate first fetch, then a constant interval with no backoff
//! - Stale alerts retained across failed fetches
//! - No state mutation once the poller has been stopped

mod config;
mod error;
mod poller;
mod source;
mod state;

pub use config::{PollerConfig, DEFAULT_BASE_URL};
pub use error::{FetchError, PollerError};
pub use poller::AlertPoller;
pub use source::{AlertSource, HttpAlertSource};
pub use state::{DisplayState, PollState};
