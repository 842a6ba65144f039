//! SIEM Dashboard - Main Entry Point

use dashboard::{init_logging, run, DashboardConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    info!("=== SIEM Dashboard v{} ===", env!("CARGO_PKG_VERSION"));

    let config = DashboardConfig::load()?;
    info!("Polling alerts from {}", config.api_url);

    let addr = "0.0.0.0:8080";
    run(config, addr).await?;

    Ok(())
}
