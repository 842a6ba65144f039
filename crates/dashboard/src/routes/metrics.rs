//! Prometheus Metrics Route

use axum::extract::State;
use std::sync::Arc;

use crate::AppState;

/// Render all recorded metrics in Prometheus text format
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
