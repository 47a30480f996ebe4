use crate::{
    application::file_damage_report::{
        dto::{FileDamageReportRequest, ImageBlob},
        use_case::{DeliveryStatus, FiledReport},
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Dispatched,
    DispatchFailed,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub page_count: usize,
    pub size_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct FileDamageReportResponse {
    pub status: ReportStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_error: Option<String>,
    pub document: DocumentSummary,
}

impl From<FiledReport> for FileDamageReportResponse {
    fn from(report: FiledReport) -> Self {
        let document = DocumentSummary {
            file_name: report.document.file_name(),
            page_count: report.document.page_count(),
            size_bytes: report.document.size_bytes(),
        };

        match report.delivery {
            DeliveryStatus::Dispatched => Self {
                status: ReportStatus::Dispatched,
                message: "PDF generated and email sent.".into(),
                dispatch_error: None,
                document,
            },
            DeliveryStatus::DispatchFailed { reason } => Self {
                status: ReportStatus::DispatchFailed,
                message: format!("PDF generated but failed to send email: {}", reason),
                dispatch_error: Some(reason),
                document,
            },
        }
    }
}

pub async fn file_damage_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileDamageReportResponse>, AppError> {
    let mut identifier = String::new();
    let mut ledger = None;
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "identifier" | "pdf_name" => identifier = field.text().await?,
            "ledger" | "damage_data" => ledger = Some(field.text().await?),
            "files" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(String::from);
                let data = field.bytes().await?;
                if data.is_empty() {
                    tracing::debug!(file_name = %file_name, "Skipping empty file part");
                    continue;
                }
                images.push(ImageBlob {
                    file_name,
                    content_type,
                    data,
                });
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let report = state
        .file_damage_report
        .execute(FileDamageReportRequest {
            identifier,
            ledger,
            images,
        })
        .await?;

    Ok(Json(report.into()))
}
