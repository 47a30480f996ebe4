use lazy_static::lazy_static;
use unicode_segmentation::UnicodeSegmentation;
use validator::Validate;

use super::errors::ReportError;

lazy_static! {
    static ref SAFE_GRAPHEME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_.\-]$").unwrap();
}

/// Replacement for any user-perceived character outside the safe set.
pub const PLACEHOLDER: char = '_';

/// Extension appended to every generated report artifact.
pub const DOCUMENT_EXTENSION: &str = "pdf";

pub const MAX_IDENTIFIER_LENGTH: usize = 120;
const MAX_IDENTIFIER_LENGTH_U64: u64 = MAX_IDENTIFIER_LENGTH as u64;

/// Shipment identifier as typed by field staff (PO number, claim reference, ...).
#[derive(Debug, Clone, Validate)]
pub struct ReportIdentifier {
    #[validate(length(min = 1, max = MAX_IDENTIFIER_LENGTH_U64))]
    pub value: String,
}

impl ReportIdentifier {
    pub fn new(value: &str) -> Result<Self, ReportError> {
        let identifier = Self {
            value: value.trim().to_string(),
        };
        identifier.validate().map_err(|e| {
            ReportError::InvalidIdentifier(format!(
                "identifier must be between 1 and {} characters ({})",
                MAX_IDENTIFIER_LENGTH, e
            ))
        })?;
        Ok(identifier)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Filesystem and header safe artifact name derived from a [`ReportIdentifier`].
///
/// The identifier is walked grapheme by grapheme so that a base character and
/// its combining marks collapse into a single placeholder, keeping the
/// sanitized name aligned with what the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn sanitize(identifier: &ReportIdentifier) -> Result<Self, ReportError> {
        let sanitized = sanitize_identifier(identifier.as_str());
        if sanitized.is_empty() {
            return Err(ReportError::InvalidIdentifier(
                "identifier has no usable characters".into(),
            ));
        }
        Ok(Self(sanitized))
    }

    pub fn stem(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, DOCUMENT_EXTENSION)
    }
}

impl std::fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn sanitize_identifier(raw: &str) -> String {
    raw.graphemes(true)
        .map(|grapheme| {
            if SAFE_GRAPHEME_REGEX.is_match(grapheme) {
                grapheme.chars().next().unwrap_or(PLACEHOLDER)
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}
