//! Locating the font used for text watermarks.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Read the configured font, or the first readable system font.
pub fn load_font_data(configured: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(path) = configured {
        return std::fs::read(path)
            .map_err(|e| AppError::Font(format!("{}: {e}", path.display())));
    }
    load_system_font_data()
}

fn load_system_font_data() -> Result<Vec<u8>> {
    for path in font_candidates() {
        if let Ok(data) = std::fs::read(&path) {
            tracing::info!(path = %path.display(), "Using system font for text watermarks");
            return Ok(data);
        }
    }
    Err(AppError::Font(
        "no system font found (set WATERMARK_FONT_PATH)".to_string(),
    ))
}

/// User font directory entries first, then well-known system paths.
fn font_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        for name in ["DejaVuSans.ttf", "Arial.ttf", "arial.ttf"] {
            candidates.push(dir.join(name));
        }
    }
    candidates.extend(system_font_candidates().iter().map(PathBuf::from));
    candidates
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &["C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\segoeui.ttf"]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_font_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.ttf");
        std::fs::write(&path, b"font bytes").unwrap();
        assert_eq!(load_font_data(Some(&path)).unwrap(), b"font bytes");
    }

    #[test]
    fn missing_configured_font_is_an_error() {
        let err = load_font_data(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(matches!(err, AppError::Font(_)));
    }

    #[test]
    fn candidates_include_system_paths() {
        let candidates = font_candidates();
        for p in system_font_candidates() {
            assert!(candidates.contains(&PathBuf::from(p)));
        }
    }
}
