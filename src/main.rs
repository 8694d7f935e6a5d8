//! RFID ROI Simulator - dashboard server entry point

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rfid_roi::{server, DashboardConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rfid_roi=info,tower_http=info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    info!("📊 RFID ROI Simulator v{}", env!("CARGO_PKG_VERSION"));

    server::run_server(config).await
}
