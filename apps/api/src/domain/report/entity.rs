use bytes::Bytes;
use chrono::NaiveDate;

use super::value_objects::ArtifactName;

/// What a page of the composed report holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Damage,
    /// Zero-based position of the photo in the upload.
    Image { position: usize },
}

/// Details printed on the cover page.
#[derive(Debug, Clone)]
pub struct CoverDetails {
    pub artifact: ArtifactName,
    pub generated_on: NaiveDate,
}

/// A fully serialized report. Only ever constructed once every page succeeded.
#[derive(Debug, Clone)]
pub struct ComposedDocument {
    pub artifact: ArtifactName,
    pub pages: Vec<PageKind>,
    pub bytes: Bytes,
}

impl ComposedDocument {
    pub fn file_name(&self) -> String {
        self.artifact.file_name()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}
