//! SIEM Alert Dashboard
//!
//! Polls the alert backend and serves the classified alert list, the
//! per-tier stats, and the latest poll error to the browser.

use alert_poller::{AlertPoller, DisplayState, PollState};
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
mod settings;
mod view;

pub use error::DashboardError;
pub use settings::{DashboardConfig, ENV_PREFIX};
pub use view::{AlertView, DashboardView, EMPTY_HINT};

/// Application state shared across handlers
pub struct AppState {
    /// Latest poll state published by the poller
    pub poll_state: watch::Receiver<PollState>,
    /// Prometheus exporter handle
    pub metrics: PrometheusHandle,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(poll_state: watch::Receiver<PollState>, metrics: PrometheusHandle) -> Self {
        Self {
            poll_state,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub version: String,
    pub uptime_seconds: u64,
    pub poller: PollerHealth,
}

/// Poller health
#[derive(Debug, Serialize)]
pub struct PollerHealth {
    pub display_state: DisplayState,
    pub alert_count: usize,
    pub last_update: Option<String>,
    pub error: Option<String>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/dashboard", get(routes::dashboard::get_dashboard))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let poller = {
        let poll_state = state.poll_state.borrow();
        PollerHealth {
            display_state: poll_state.display_state(),
            alert_count: poll_state.alerts.len(),
            last_update: poll_state.last_update.map(|t| t.to_rfc3339()),
            error: poll_state.error.clone(),
        }
    };

    let status = if poller.error.is_some() {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now().timestamp(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        poller,
    })
}

/// Initialize logging
pub fn init_logging() -> Result<(), DashboardError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| DashboardError::Logging(e.to_string()))
}

/// Poll the configured backend and serve the dashboard until Ctrl-C
pub async fn run(config: DashboardConfig, addr: &str) -> Result<(), DashboardError> {
    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| DashboardError::Metrics(e.to_string()))?;

    let poller = AlertPoller::http(config.poller_config())?;
    let state = Arc::new(AppState::new(poller.subscribe(), metrics));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    poller.start()?;
    info!("Serving dashboard on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    poller.stop();
    served?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
