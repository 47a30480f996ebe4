use async_trait::async_trait;
use bytes::Bytes;

/// A composed report ready to be emailed.
#[derive(Debug, Clone)]
pub struct ReportAttachment {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("Failed to build email: {0}")]
    Message(String),
    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// Delivers a composed report to the configured distribution list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn send_report(&self, attachment: &ReportAttachment) -> Result<(), DispatchError>;

    /// Short label for health output and logs.
    fn transport_name(&self) -> &'static str;
}
