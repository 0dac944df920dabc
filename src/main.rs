//! Monte-Carlo DCF Valuation Console
//!
//! Edit valuation assumptions, run the remote simulation, and inspect the
//! percentile summary from the terminal.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use dcf_valuation::console::ValuationConsole;
use dcf_valuation::utils::telemetry;
use dcf_valuation::{ConfigLoader, HttpTransport, Workspace};

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = ConfigLoader::from_env()
        .load()
        .await
        .context("Failed to load configuration")?;

    // File logging; the terminal belongs to the UI
    let _guard = telemetry::init(&config.log_dir).context("Failed to initialise logging")?;
    info!(api = %config.api_base_url, "Starting DCF valuation console");

    // ──────────────────────────────────────────────────────────────────────────
    // WIRING
    // ──────────────────────────────────────────────────────────────────────────

    let transport = HttpTransport::new(&config.api_base_url, config.connect_timeout())
        .context("Failed to build HTTP client")?;
    let (workspace, events) = Workspace::new(&config, Arc::new(transport));

    ValuationConsole::new(workspace, events).run().await?;

    info!("Console closed");
    Ok(())
}
