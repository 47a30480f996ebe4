use super::helpers::{
    FailingMailer, Part, RecordingMailer, build_config, expect_status, png_part, read_json, send,
    spawn_app, spawn_app_with, tiny_png_bytes, upload_request,
};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

const WATER_DAMAGE: &str = r#"{"Water damage": {"checked": true, "quantity": 2}}"#;

#[tokio::test]
async fn composes_and_dispatches_a_report() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone());

    let first = tiny_png_bytes(40, 30);
    let second = tiny_png_bytes(30, 40);
    let req = upload_request(
        "/api/v1/damage-reports",
        &[
            Part::Text("identifier", "PO#123 Düsseldorf"),
            Part::Text("ledger", WATER_DAMAGE),
            png_part("front.png", &first),
            png_part("back.png", &second),
        ],
    );

    let res = expect_status(send(&app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["status"], "dispatched");
    assert_eq!(body["message"], "PDF generated and email sent.");
    assert!(body.get("dispatch_error").is_none());
    assert_eq!(body["document"]["file_name"], "PO_123_D_sseldorf.pdf");
    assert_eq!(body["document"]["page_count"], 4);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].file_name, "PO_123_D_sseldorf.pdf");
    assert_eq!(body["document"]["size_bytes"], sent[0].bytes.len());

    let pdf = lopdf::Document::load_mem(&sent[0].bytes).expect("attachment is a readable pdf");
    assert_eq!(pdf.get_pages().len(), 4);
}

#[tokio::test]
async fn dispatch_failure_is_a_partial_success() {
    let mailer = Arc::new(FailingMailer::default());
    let app = spawn_app(mailer.clone());

    let photo = tiny_png_bytes(8, 8);
    let req = upload_request(
        "/api/v1/damage-reports",
        &[
            Part::Text("identifier", "PO-77"),
            png_part("only.png", &photo),
        ],
    );

    let res = expect_status(send(&app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["status"], "dispatch_failed");
    let message = body["message"].as_str().expect("message is a string");
    assert!(message.starts_with("PDF generated but failed to send email: "), "{message}");
    assert!(message.contains("535 authentication rejected"), "{message}");
    assert!(
        body["dispatch_error"]
            .as_str()
            .is_some_and(|e| e.contains("535 authentication rejected"))
    );
    // Cover plus one photo; no ledger means no damage page.
    assert_eq!(body["document"]["page_count"], 2);

    let attempted = mailer.attempted();
    assert_eq!(attempted.len(), 1);
    assert!(attempted[0].bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn rejects_upload_without_images() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone());

    let req = upload_request(
        "/api/v1/damage-reports",
        &[
            Part::Text("identifier", "PO-1"),
            Part::Text("ledger", WATER_DAMAGE),
        ],
    );

    let res = expect_status(send(&app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "No valid images uploaded");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn empty_file_parts_do_not_count_as_images() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone());

    let req = upload_request(
        "/api/v1/damage-reports",
        &[Part::Text("identifier", "PO-1"), png_part("empty.png", &[])],
    );

    expect_status(send(&app, req).await, StatusCode::BAD_REQUEST).await;
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn rejects_blank_identifier() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone());

    let photo = tiny_png_bytes(4, 4);
    let req = upload_request(
        "/api/v1/damage-reports",
        &[Part::Text("identifier", "   "), png_part("a.png", &photo)],
    );

    let res = expect_status(send(&app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn malformed_ledger_is_a_server_error() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone());

    let photo = tiny_png_bytes(4, 4);
    let req = upload_request(
        "/api/v1/damage-reports",
        &[
            Part::Text("identifier", "PO-2"),
            Part::Text("ledger", "{\"Water damage\": "),
            png_part("a.png", &photo),
        ],
    );

    let res = expect_status(send(&app, req).await, StatusCode::INTERNAL_SERVER_ERROR).await;
    let body: Value = read_json(res).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Failed to parse damage data")),
        "{body}"
    );
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn corrupt_photo_aborts_the_request() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone());

    let good = tiny_png_bytes(4, 4);
    let req = upload_request(
        "/api/v1/damage-reports",
        &[
            Part::Text("identifier", "PO-3"),
            png_part("good.png", &good),
            Part::File {
                name: "files",
                file_name: "broken.jpg",
                content_type: "image/jpeg",
                bytes: b"definitely not a jpeg",
            },
        ],
    );

    let res = expect_status(send(&app, req).await, StatusCode::INTERNAL_SERVER_ERROR).await;
    let body: Value = read_json(res).await;
    let error = body["error"].as_str().expect("error is a string");
    assert!(error.contains("broken.jpg"), "{error}");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn legacy_form_fields_and_path_are_accepted() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone());

    let photo = tiny_png_bytes(6, 6);
    let req = upload_request(
        "/upload",
        &[
            Part::Text("pdf_name", "Shipment 9"),
            Part::Text(
                "damage_data",
                r#"{"Broken straps": {"checked": false, "quantity": 0, "note": ""}}"#,
            ),
            png_part("a.png", &photo),
        ],
    );

    let res = expect_status(send(&app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["document"]["file_name"], "Shipment_9.pdf");
    // Nothing in the ledger was reported, so there is no damage page.
    assert_eq!(body["document"]["page_count"], 2);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn upload_over_the_body_limit_is_rejected() {
    let mailer = Arc::new(RecordingMailer::default());
    let mut config = build_config();
    config.max_upload_bytes = 4 * 1024;
    let app = spawn_app_with(config, mailer.clone());

    let big = vec![0xAB_u8; 64 * 1024];
    let req = upload_request(
        "/api/v1/damage-reports",
        &[Part::Text("identifier", "PO-4"), png_part("big.png", &big)],
    );

    let res = expect_status(send(&app, req).await, StatusCode::PAYLOAD_TOO_LARGE).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Upload exceeds the maximum allowed size");
    assert!(mailer.sent().is_empty());
}
