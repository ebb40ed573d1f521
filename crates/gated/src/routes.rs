//! API routes for gated
//!
//! Every failure is answered with `{ "ok": false, "error": ... }`.

use crate::server::AppState;
use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gate_common::AnalysisReport;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

type AppStateArc = Arc<AppState>;

/// Multipart field carrying the log
pub const UPLOAD_FIELD: &str = "logfile";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

/// Successful analysis: the report with an `ok` flag alongside its fields
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, error: impl Into<String>) -> ApiError {
    let error = error.into();
    warn!("  Rejected upload ({}): {}", status.as_u16(), error);
    (status, Json(ErrorBody { ok: false, error }))
}

fn multipart_failed(err: MultipartError) -> ApiError {
    reject(err.status(), err.body_text())
}

/// Case-insensitive extension check against `.txt`-style entries
pub fn extension_allowed(filename: &str, allowed: &[String]) -> bool {
    let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = format!(".{}", ext.to_lowercase());
    allowed.iter().any(|a| a.to_lowercase() == ext)
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: gate_common::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Analyze Routes
// ============================================================================

pub fn analyze_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/analyze", post(analyze_upload))
}

async fn analyze_upload(
    State(state): State<AppStateArc>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| reject(e.status(), e.body_text()))?;
    let server = &state.config.server;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_failed)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !extension_allowed(&filename, &server.allowed_extensions) {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                format!(
                    "Only {} files are accepted.",
                    server.allowed_extensions.join("/")
                ),
            ));
        }

        let bytes = field.bytes().await.map_err(multipart_failed)?;
        upload = Some((filename, bytes));
        break;
    }

    let Some((filename, bytes)) = upload else {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            format!("No file field '{}' provided.", UPLOAD_FIELD),
        ));
    };

    let text = String::from_utf8_lossy(&bytes);
    let report = AnalysisReport::from_text(&text, &state.config.analysis);
    info!(
        "  Analyzed {} ({} bytes): {} close attempts, confidence {}",
        filename,
        bytes.len(),
        report.diagnosis.timeline_events.len(),
        report.diagnosis.confidence.level.as_str()
    );

    Ok(Json(AnalyzeResponse { ok: true, report }))
}
