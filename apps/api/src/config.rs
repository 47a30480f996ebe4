//! Application configuration loading from environment variables.
//!
//! Configuration is read once at startup (after `dotenvy` has loaded any `.env`
//! file) and then shared read-only for the lifetime of the process.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `MAIL_FROM`: Sender mailbox, e.g. `Damage Reports <reports@example.com>`
//! - `MAIL_RECIPIENTS`: Comma separated distribution list
//! - `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`: Outbound relay (smtp transport only)
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,damage_report=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 5000)
//! - `REPORT_LOCALE`: Report language, `en` or `es` (default: "en")
//! - `REPORT_LOGO_PATH`: PNG/JPEG stamped in every page header
//! - `MAX_UPLOAD_BYTES`: Request body limit (default: 50 MiB)
//! - `ALLOWED_ORIGINS`: Comma separated CORS origins (default: any origin)
//! - `MAIL_TRANSPORT`: `smtp` or `file` (default: "smtp")
//! - `SMTP_PORT`: Relay port (default: 587)
//! - `SMTP_USE_TLS`: Use STARTTLS (default: true)
//! - `MAIL_OUTBOX_DIR`: Directory for `.eml` files with the file transport (default: "./outbox")

use crate::domain::report::locale::ReportLocale;
use serde::Deserialize;
use std::path::PathBuf;
use validator::ValidateEmail;

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Language the report and its email are written in
    pub report_locale: ReportLocale,

    /// Optional branding logo for page headers
    pub report_logo_path: Option<PathBuf>,

    /// Maximum accepted request body, uploads included
    pub max_upload_bytes: usize,

    /// CORS origins allowed to post the upload form; empty means any
    pub allowed_origins: Vec<String>,

    pub mail: MailConfig,
}

/// Outbound mail settings. Never mutated after startup.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub transport: MailTransportConfig,

    /// Sender mailbox
    pub from: String,

    /// Fixed distribution list every report is sent to
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MailTransportConfig {
    Smtp {
        host: String,
        port: u16,
        username: String,
        password: String,
        use_tls: bool,
    },
    /// Writes each message as an `.eml` file, for local development
    File { path: PathBuf },
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required environment variable is missing or
    /// cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let transport = match env.or("MAIL_TRANSPORT", "smtp".to_string())?.as_str() {
            "smtp" => MailTransportConfig::Smtp {
                host: env.required("SMTP_HOST")?,
                port: env.or("SMTP_PORT", 587)?,
                username: env.required("SMTP_USERNAME")?,
                password: env.required("SMTP_PASSWORD")?,
                use_tls: env.or("SMTP_USE_TLS", true)?,
            },
            "file" => MailTransportConfig::File {
                path: env.or("MAIL_OUTBOX_DIR", PathBuf::from("./outbox"))?,
            },
            other => anyhow::bail!("Unsupported MAIL_TRANSPORT: {}", other),
        };

        let recipients = split_list(&env.required("MAIL_RECIPIENTS")?);
        if recipients.is_empty() {
            anyhow::bail!("MAIL_RECIPIENTS must list at least one address");
        }
        if let Some(invalid) = recipients.iter().find(|r| !r.validate_email()) {
            anyhow::bail!("MAIL_RECIPIENTS contains an invalid address: {}", invalid);
        }

        Ok(Self {
            host: env.or("HOST", "0.0.0.0".to_string())?,
            port: env.or("PORT", 5000)?,
            report_locale: env.or("REPORT_LOCALE", ReportLocale::En)?,
            report_logo_path: env.optional("REPORT_LOGO_PATH").map(PathBuf::from),
            max_upload_bytes: env.or("MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
            allowed_origins: env
                .optional("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            mail: MailConfig {
                transport,
                from: env.required("MAIL_FROM")?,
                recipients,
            },
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Load a set, non-blank variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Load a required variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set.
    fn required(&self, key: &str) -> anyhow::Result<String> {
        self.optional(key)
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
    }

    /// Load a variable with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but cannot be parsed.
    fn or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(val) => val
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
            None => Ok(default),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
