use bytes::Bytes;

/// One uploaded photo, as received from the form.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct FileDamageReportRequest {
    pub identifier: String,
    /// Raw JSON ledger payload, if the form sent one.
    pub ledger: Option<String>,
    /// Photos in upload order.
    pub images: Vec<ImageBlob>,
}
