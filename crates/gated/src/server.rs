//! HTTP server for gated

use crate::routes;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use gate_common::GateConfig;
use std::sync::Arc;
use std::time::Instant;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub config: GateConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
        }
    }
}

/// Build the router. The body cap replaces axum's default 2 MB limit.
pub fn router(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;
    let state = Arc::new(state);

    Router::new()
        .merge(routes::health_routes())
        .merge(routes::analyze_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.server.bind.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
