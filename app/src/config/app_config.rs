//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;

use super::validation::validate_setting;
use crate::services::temp::TempStore;

/// Default JPEG quality for re-encoded output.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Explicit font file; system fonts are searched when unset.
    pub font_path: Option<PathBuf>,
    pub jpeg_quality: u8,
    /// Where uploaded images are staged.
    pub temp_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            temp_dir: TempStore::default_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Values that fail validation are
    /// logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> Option<String> {
            let value = lookup(key).filter(|v| !v.trim().is_empty())?;
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(e) => {
                    tracing::warn!(key, value = %value, "Ignoring invalid setting: {e}");
                    None
                }
            }
        };

        let defaults = Self::default();
        Self {
            font_path: g("WATERMARK_FONT_PATH").map(PathBuf::from),
            jpeg_quality: g("WATERMARK_JPEG_QUALITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.jpeg_quality),
            temp_dir: g("WATERMARK_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
        }
    }
}
