use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use damage_report::{
    application::file_damage_report::use_case::FileDamageReportUseCase,
    config::{Config, MailConfig, MailTransportConfig},
    domain::report::locale::ReportLocale,
    infrastructure::{
        mail::{DispatchError, ReportAttachment, ReportMailer},
        pdf::{Branding, ReportComposer},
    },
    presentation::http::{routes::create_router, state::AppState},
};
use serde::de::DeserializeOwned;
use std::{
    io::Cursor,
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tower::ServiceExt;
use uuid::Uuid;

/// Mailer that keeps every attachment it is handed.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<ReportAttachment>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<ReportAttachment> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl ReportMailer for RecordingMailer {
    async fn send_report(&self, attachment: &ReportAttachment) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(attachment.clone());
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// Mailer whose relay always refuses, after recording what it was handed.
#[derive(Default)]
pub struct FailingMailer {
    attempted: Mutex<Vec<ReportAttachment>>,
}

impl FailingMailer {
    pub fn attempted(&self) -> Vec<ReportAttachment> {
        self.attempted.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl ReportMailer for FailingMailer {
    async fn send_report(&self, attachment: &ReportAttachment) -> Result<(), DispatchError> {
        self.attempted
            .lock()
            .expect("mailer lock poisoned")
            .push(attachment.clone());
        Err(DispatchError::Transport("535 authentication rejected".to_string()))
    }

    fn transport_name(&self) -> &'static str {
        "failing"
    }
}

pub fn build_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        report_locale: ReportLocale::En,
        report_logo_path: None,
        max_upload_bytes: 10 * 1024 * 1024,
        allowed_origins: Vec::new(),
        mail: MailConfig {
            transport: MailTransportConfig::File {
                path: PathBuf::from("./outbox"),
            },
            from: "reports@example.com".to_string(),
            recipients: vec!["claims@example.com".to_string()],
        },
    }
}

pub fn spawn_app(mailer: Arc<dyn ReportMailer>) -> Router {
    spawn_app_with(build_config(), mailer)
}

pub fn spawn_app_with(config: Config, mailer: Arc<dyn ReportMailer>) -> Router {
    let composer = ReportComposer::new(Branding::default(), config.report_locale);

    let state = AppState {
        config: Arc::new(config),
        mail_transport: mailer.transport_name(),
        file_damage_report: Arc::new(FileDamageReportUseCase::new(composer, mailer)),
    };

    create_router(state)
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();

    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

pub fn tiny_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let uuid_bytes = *Uuid::now_v7().as_bytes();
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        let i = ((x + y) as usize) % uuid_bytes.len();
        image::Rgb([uuid_bytes[i], 128, 255 - uuid_bytes[i]])
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("failed to encode png");
    bytes
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let boundary = format!("----damage-report-boundary-{}", Uuid::now_v7());
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(
                    format!("Content-Type: {}\r\n\r\n", content_type).as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (boundary, body)
}

pub fn upload_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let (boundary, body) = multipart_body(parts);
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("failed to build upload request")
}

pub fn png_part<'a>(file_name: &'a str, bytes: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "files",
        file_name,
        content_type: "image/png",
        bytes,
    }
}
