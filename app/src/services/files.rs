//! Image file validation, metadata and output naming.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Accepted image extensions (lowercase, with the leading dot).
pub const SUPPORTED_FORMATS: &[&str] = &[".jpg", ".jpeg", ".png", ".bmp"];

/// Metadata about an image file, as shown to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub extension: String,
    pub modified_at: Option<String>,
}

/// Lowercase extension of `path` with its leading dot, or `""` if it has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

pub fn is_supported(extension: &str) -> bool {
    SUPPORTED_FORMATS.contains(&extension.to_lowercase().as_str())
}

/// Check that `path` is an existing regular file with a supported extension.
pub fn validate_image(path: &Path) -> Result<()> {
    let meta = std::fs::metadata(path)
        .map_err(|e| AppError::NotFound(format!("{}: {e}", path.display())))?;

    if meta.is_dir() {
        return Err(AppError::NotAFile(path.display().to_string()));
    }

    let ext = extension_of(path);
    if !is_supported(&ext) {
        return Err(AppError::UnsupportedFormat(ext));
    }

    Ok(())
}

pub fn file_info(path: &Path) -> Result<FileInfo> {
    let meta = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
        .unwrap_or_default();
    let modified_at = meta.modified().ok().map(|t| {
        let dt: chrono::DateTime<chrono::Utc> = t.into();
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    });

    Ok(FileInfo {
        name,
        path: path.display().to_string(),
        size: meta.len(),
        extension: extension_of(path),
        modified_at,
    })
}

/// `<dir>/<stem>_watermarked<ext>` next to the original file.
///
/// The extension keeps its original case.
pub fn output_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_watermarked{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_appends_suffix() {
        assert_eq!(
            output_path_for(Path::new("/photos/cat.jpg")),
            PathBuf::from("/photos/cat_watermarked.jpg")
        );
        assert_eq!(
            output_path_for(Path::new("/photos/Holiday.PNG")),
            PathBuf::from("/photos/Holiday_watermarked.PNG")
        );
        assert_eq!(
            output_path_for(Path::new("scan.v2.bmp")),
            PathBuf::from("scan.v2_watermarked.bmp")
        );
        assert_eq!(
            output_path_for(Path::new("/photos/raw")),
            PathBuf::from("/photos/raw_watermarked")
        );
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of(Path::new("a/B.JPEG")), ".jpeg");
        assert_eq!(extension_of(Path::new("noext")), "");
    }

    #[test]
    fn supported_formats_match_whitelist() {
        for ext in [".jpg", ".JPG", ".jpeg", ".png", ".bmp"] {
            assert!(is_supported(ext), "{ext}");
        }
        for ext in [".gif", ".webp", "", "jpg"] {
            assert!(!is_supported(ext), "{ext}");
        }
    }

    #[test]
    fn validate_image_checks_existence_kind_and_extension() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.png");
        assert!(matches!(validate_image(&missing), Err(AppError::NotFound(_))));

        let folder = dir.path().join("folder.png");
        std::fs::create_dir(&folder).unwrap();
        assert!(matches!(validate_image(&folder), Err(AppError::NotAFile(_))));

        let gif = dir.path().join("anim.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();
        assert!(matches!(
            validate_image(&gif),
            Err(AppError::UnsupportedFormat(ext)) if ext == ".gif"
        ));

        let png = dir.path().join("ok.PNG");
        std::fs::write(&png, b"not checked here").unwrap();
        assert!(validate_image(&png).is_ok());
    }

    #[test]
    fn file_info_reports_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Photo.JPG");
        std::fs::write(&path, [0u8; 42]).unwrap();

        let info = file_info(&path).unwrap();
        assert_eq!(info.name, "Photo.JPG");
        assert_eq!(info.size, 42);
        assert_eq!(info.extension, ".jpg");
        assert!(info.modified_at.is_some());
    }
}
