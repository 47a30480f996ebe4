use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;

use super::{errors::ReportError, locale::ReportLocale};

/// A free-text remark attached to a damage category. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageNote(String);

impl DamageNote {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageEntry {
    pub checked: bool,
    pub quantity: Option<NonZeroU32>,
    pub note: Option<DamageNote>,
}

impl DamageEntry {
    /// An entry is reported when it was ticked or any detail was filled in.
    pub fn is_reported(&self) -> bool {
        self.checked || self.quantity.is_some() || self.note.is_some()
    }
}

/// Wire shape of one ledger entry as posted by the upload form.
#[derive(Debug, Deserialize)]
struct RawDamageEntry {
    #[serde(default)]
    checked: Option<bool>,
    #[serde(default)]
    quantity: Option<RawQuantity>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(serde_json::Number),
    Text(String),
}

impl RawQuantity {
    fn into_quantity(self, category: &str) -> Result<Option<NonZeroU32>, ReportError> {
        let invalid = || {
            ReportError::InvalidLedger(format!(
                "quantity for '{}' must be a positive whole number",
                category
            ))
        };

        let value = match self {
            Self::Number(n) => n.as_u64().ok_or_else(invalid)?,
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse::<u64>().map_err(|_| invalid())?
            }
        };

        let value = u32::try_from(value).map_err(|_| invalid())?;
        Ok(NonZeroU32::new(value))
    }
}

/// Damage categories for one shipment, in the order the form declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageLedger {
    entries: Vec<(String, DamageEntry)>,
}

impl DamageLedger {
    pub fn new(entries: Vec<(String, DamageEntry)>) -> Self {
        Self { entries }
    }

    /// Parses the form's JSON payload. A missing or blank payload is an empty ledger.
    pub fn parse(payload: Option<&str>) -> Result<Self, ReportError> {
        let payload = match payload.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => return Ok(Self::default()),
        };

        let root: serde_json::Map<String, Value> = serde_json::from_str(payload)
            .map_err(|e| ReportError::InvalidLedger(e.to_string()))?;

        let mut entries = Vec::with_capacity(root.len());
        for (category, value) in root {
            let raw: RawDamageEntry = serde_json::from_value(value).map_err(|e| {
                ReportError::InvalidLedger(format!("entry '{}': {}", category, e))
            })?;

            let quantity = match raw.quantity {
                Some(q) => q.into_quantity(&category)?,
                None => None,
            };

            let entry = DamageEntry {
                checked: raw.checked.unwrap_or(false),
                quantity,
                note: raw.note.as_deref().and_then(DamageNote::new),
            };
            entries.push((category, entry));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, DamageEntry)] {
        &self.entries
    }

    /// Renders the reported entries as display lines, preserving declaration order.
    pub fn render(&self, locale: ReportLocale) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_reported())
            .map(|(category, entry)| render_line(category, entry, locale))
            .collect()
    }
}

fn render_line(category: &str, entry: &DamageEntry, locale: ReportLocale) -> String {
    let mut line = format!("- {}", locale.category_label(category));
    if let Some(note) = &entry.note {
        line.push_str(": ");
        line.push_str(note.as_str());
    }
    if let Some(quantity) = entry.quantity {
        line.push_str(&format!(" ({}: {})", locale.quantity_label(), quantity));
    }
    line
}
