use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language variant a report (and its delivery email) is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLocale {
    #[default]
    En,
    Es,
}

impl FromStr for ReportLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "es" | "spanish" | "español" => Ok(Self::Es),
            other => Err(format!("unsupported report locale '{}'", other)),
        }
    }
}

impl ReportLocale {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    pub fn report_title(self) -> &'static str {
        match self {
            Self::En => "Damage Report",
            Self::Es => "Reporte de Daños",
        }
    }

    pub fn identifier_label(self) -> &'static str {
        "PO Number"
    }

    pub fn date_label(self) -> &'static str {
        match self {
            Self::En => "Date",
            Self::Es => "Fecha",
        }
    }

    pub fn damage_heading(self) -> &'static str {
        match self {
            Self::En => "Damage Details:",
            Self::Es => "Detalle de Daños:",
        }
    }

    pub fn quantity_label(self) -> &'static str {
        match self {
            Self::En => "Qty",
            Self::Es => "Cantidad",
        }
    }

    pub fn page_label(self, number: usize) -> String {
        match self {
            Self::En => format!("Page {}", number),
            Self::Es => format!("Página {}", number),
        }
    }

    /// Display label for a ledger category. Unknown keys pass through unchanged.
    pub fn category_label<'a>(self, key: &'a str) -> &'a str {
        match self {
            Self::En => key,
            Self::Es => match key {
                "Damages" => "Daños",
                "Water damage" => "Daño por agua",
                "Broken straps" => "Correas rotas",
                "Other" => "Otro",
                _ => key,
            },
        }
    }

    pub fn email_subject(self, file_name: &str) -> String {
        format!("{} - {}", self.report_title(), file_name)
    }

    pub fn email_body(self) -> &'static str {
        match self {
            Self::En => "Good day, please find the damage report attached.\n\nKind regards.",
            Self::Es => "Buen día, adjunto el reporte de daños.\n\nSaludos cordiales.",
        }
    }
}
