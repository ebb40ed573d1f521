//! HTTP tests for gated
//!
//! Drives the router in-process:
//! - GET /v1/health
//! - POST /v1/analyze happy path and every rejection

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use gate_common::GateConfig;
use gated::server::{router, AppState};
use http_body_util::BodyExt;
use tower::ServiceExt;

const BOUNDARY: &str = "gate-test-boundary";

const LOG: &str = "\
# device_id=GX-0142 fw=4.2.1 log_schema=2
2024-03-01T06:00:00Z|MOVE|to=closed start_deg=90 end_deg=0 duration_ms=9000 reed_end=1 reed_settle_30s=1
2024-03-01T07:00:00Z|MOVE|to=closed start_deg=90 end_deg=40 duration_ms=9000 reed_end=0 reed_settle_30s=0
";

fn app() -> Router {
    router(AppState::new(GateConfig::default()))
}

fn multipart_body(field: &str, filename: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

fn upload(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/analyze")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/v1/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["version"], gate_common::VERSION);
    assert!(json["uptime_secs"].is_u64());
}

#[tokio::test]
async fn test_analyze_upload() {
    let (status, json) = send(app(), upload(multipart_body("logfile", "gate.log", LOG))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["version"], gate_common::VERSION);
    assert_eq!(json["header"]["device_id"], "GX-0142");
    assert_eq!(json["features"]["good"], 1);
    assert_eq!(json["features"]["hard_fail"], 1);
    assert_eq!(
        json["diagnosis"]["episodes"][0]["kind"],
        "MECHANICAL_HARD_FAIL_WINDOW"
    );
    assert_eq!(json["diagnosis"]["timeline_events"][1]["outcome"], "HARD_FAIL");
}

#[tokio::test]
async fn test_extension_is_case_insensitive() {
    let (status, json) = send(app(), upload(multipart_body("logfile", "GATE.TXT", LOG))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn test_rejects_wrong_extension() {
    let (status, json) = send(app(), upload(multipart_body("logfile", "gate.csv", LOG))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Only .txt/.log files are accepted.");
}

#[tokio::test]
async fn test_rejects_missing_field() {
    let (status, json) = send(app(), upload(multipart_body("attachment", "gate.log", LOG))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "No file field 'logfile' provided.");
}

#[tokio::test]
async fn test_rejects_non_multipart() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/analyze")
        .header("content-type", "text/plain")
        .body(Body::from(LOG))
        .unwrap();
    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn test_rejects_oversized_upload() {
    let mut config = GateConfig::default();
    config.server.max_upload_bytes = 256;
    let app = router(AppState::new(config));

    let big = LOG.repeat(8);
    let (status, _) = send(app, upload(multipart_body("logfile", "gate.log", &big))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_invalid_utf8_upload_is_analyzed() {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"logfile\"; filename=\"gate.log\"\r\n\
         \r\n\
         # device_id="
    )
    .into_bytes();
    body.extend_from_slice(b"\xffGX\n");
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/v1/analyze")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["header"]["device_id"], "\u{FFFD}GX");
}
