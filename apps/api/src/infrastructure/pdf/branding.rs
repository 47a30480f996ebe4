use std::{path::Path, sync::Arc};

use crate::infrastructure::imaging::{NormalizedImage, normalizer::prepare_unrotated};

/// Read-only assets stamped on every report page header.
#[derive(Debug, Clone, Default)]
pub struct Branding {
    pub logo: Option<Arc<NormalizedImage>>,
}

impl Branding {
    /// Loads the header logo once at startup.
    ///
    /// A configured path that does not exist is logged and reports are produced
    /// without a logo; a file that exists but cannot be decoded is a startup error.
    pub fn load(logo_path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = logo_path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::warn!("Logo file not found at {}", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read logo {}: {}", path.display(), e))?;
        let logo = prepare_unrotated(&raw)
            .map_err(|e| anyhow::anyhow!("Failed to load logo {}: {}", path.display(), e))?;

        tracing::info!(
            width = logo.width_px,
            height = logo.height_px,
            "Loaded report logo from {}",
            path.display()
        );
        Ok(Self {
            logo: Some(Arc::new(logo)),
        })
    }
}
