//! HTTP error handling and response conversion.
//!
//! Report failures are mapped to status codes by their [`FailureKind`]: caller
//! mistakes are 400, malformed ledgers and undecodable photos are 500. Every
//! error body has the shape `{"error": "<message>"}`.

use crate::domain::report::errors::{FailureKind, ReportError};
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request was missing or misusing a form field (400).
    BadRequest(String),

    /// Upload exceeded the configured body limit (413).
    PayloadTooLarge(String),

    /// Damage ledger could not be parsed (500).
    Ledger(String),

    /// A photo or the document built from it failed (500).
    Image(String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::Ledger(msg) => write!(f, "Ledger error: {}", msg),
            Self::Image(msg) => write!(f, "Image error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Ledger(_) | Self::Image(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the caller.
    ///
    /// Report failures surface their own text so the upload form can show
    /// which photo or ledger entry was at fault.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::PayloadTooLarge(msg)
            | Self::Ledger(msg)
            | Self::Image(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("error={}", self);
            }
            StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::warn!("error={}", self);
            }
            _ => {
                tracing::info!("error={}", self);
            }
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// === Report Error Conversion ===

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err.kind() {
            FailureKind::Input => AppError::BadRequest(message),
            FailureKind::Ledger => AppError::Ledger(message),
            FailureKind::Image => AppError::Image(message),
        }
    }
}

// === Multipart Error Conversion ===

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".into())
        } else {
            tracing::debug!(multipart_error = %err);
            AppError::BadRequest(format!("Malformed upload: {}", err.body_text()))
        }
    }
}
