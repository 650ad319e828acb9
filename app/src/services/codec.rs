//! Decoding input images and encoding watermarked output.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{AppError, Result};
use crate::services::files::extension_of;

/// Decode image bytes (format auto-detected) into an RGBA image.
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).map_err(AppError::Load)?;
    Ok(match img {
        DynamicImage::ImageRgba8(_) => img,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    })
}

pub fn load_image_file(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path)?;
    load_image(&bytes)
}

/// Encode for the given extension: JPEG (with `quality`), PNG or BMP.
///
/// Unknown extensions are written as JPEG. JPEG has no alpha channel, so
/// transparency is dropped there.
pub fn encode_image(img: &RgbaImage, extension: &str, quality: u8) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    match extension.to_lowercase().as_str() {
        ".png" => img
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(AppError::Encode)?,
        ".bmp" => img
            .write_to(&mut cursor, ImageFormat::Bmp)
            .map_err(AppError::Encode)?,
        _ => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut cursor, quality)
                .encode_image(&rgb)
                .map_err(AppError::Encode)?;
        }
    }
    Ok(cursor.into_inner())
}

/// Encode by the extension of `path` and write the file.
pub fn save_image(img: &RgbaImage, path: &Path, quality: u8) -> Result<()> {
    let bytes = encode_image(img, &extension_of(path), quality)?;
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), "Saved watermarked image");
    Ok(())
}

/// The raw file as a base64 `data:` URI for previews.
///
/// The MIME type follows the extension; unknown extensions are labelled JPEG.
pub fn image_preview(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    let mime = mime_guess::from_path(path).first_raw().unwrap_or("image/jpeg");
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    Ok(format!("data:{mime};base64,{encoded}"))
}
