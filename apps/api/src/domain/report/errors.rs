use thiserror::Error;

/// Failures raised while turning an upload into a composed report.
///
/// Delivery failures are not represented here. They are reported through
/// [`crate::infrastructure::mail::DispatchError`] and never abort a request
/// once the document exists.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("No valid images uploaded")]
    MissingImages,
    #[error("Failed to parse damage data: {0}")]
    InvalidLedger(String),
    #[error("Failed to process image {position} ({file_name}): {reason}")]
    Image {
        position: usize,
        file_name: String,
        reason: String,
    },
    #[error("Failed to build document: {0}")]
    Document(String),
}

/// Caller-facing classification of a [`ReportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Input,
    Ledger,
    Image,
}

impl ReportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidIdentifier(_) | Self::MissingImages => FailureKind::Input,
            Self::InvalidLedger(_) => FailureKind::Ledger,
            Self::Image { .. } | Self::Document(_) => FailureKind::Image,
        }
    }
}
