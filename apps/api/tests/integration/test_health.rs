use super::helpers::{RecordingMailer, expect_status, read_json, send, spawn_app};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn health_reports_transport_and_version() {
    let app = spawn_app(Arc::new(RecordingMailer::default()));

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("failed to build health request");
    let res = expect_status(send(&app, req).await, StatusCode::OK).await;

    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mail_transport"], "recording");
    assert_eq!(body["locale"], "en");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn inbound_request_id_is_echoed() {
    let app = spawn_app(Arc::new(RecordingMailer::default()));

    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "upstream-42")
        .body(Body::empty())
        .expect("failed to build health request");
    let res = send(&app, req).await;

    assert_eq!(
        res.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("upstream-42")
    );
}
