//! gated - gate log upload and analysis service

use anyhow::{Context, Result};
use gate_common::GateConfig;
use gated::server::{self, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("[BOOT] gated v{} starting", gate_common::VERSION);

    let config = GateConfig::load(None).context("Failed to load configuration")?;
    info!(
        "[BOOT] Config ready (max upload {} bytes, extensions {})",
        config.server.max_upload_bytes,
        config.server.allowed_extensions.join(",")
    );

    server::run(AppState::new(config)).await
}
