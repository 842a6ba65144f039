//! Dashboard Routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{AppState, DashboardView};

/// Current dashboard view
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let view = DashboardView::build(&state.poll_state.borrow());
    Json(view)
}
