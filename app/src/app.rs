//! The application object: everything the front-end can call.

use std::path::{Path, PathBuf};

use watermark_engine::{FontVec, GlyphRenderer, WatermarkOptions, Watermarker};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::services::codec;
use crate::services::files::{self, FileInfo, SUPPORTED_FORMATS};
use crate::services::temp::TempStore;

pub struct App<G = FontVec> {
    watermarker: Watermarker<G>,
    temp: TempStore,
    jpeg_quality: u8,
}

impl<G: GlyphRenderer> App<G> {
    pub fn new(watermarker: Watermarker<G>, config: &AppConfig) -> Self {
        Self {
            watermarker,
            temp: TempStore::new(config.temp_dir.clone()),
            jpeg_quality: config.jpeg_quality,
        }
    }

    pub fn temp_store(&self) -> &TempStore {
        &self.temp
    }

    /// Stage uploaded bytes and validate them as an image.
    ///
    /// The staged file is removed again when validation fails.
    pub fn upload_image(&self, data: &[u8], filename: &str) -> Result<FileInfo> {
        let path = self.temp.save(data, filename)?;
        if let Err(e) = files::validate_image(&path) {
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }
        files::file_info(&path)
    }

    /// Add a text watermark and write `<name>_watermarked<ext>` next to `image_path`.
    pub fn add_text_watermark(
        &self,
        image_path: &Path,
        options: &WatermarkOptions,
    ) -> Result<PathBuf> {
        files::validate_image(image_path)?;
        let base = codec::load_image_file(image_path)?;

        let result = self.watermarker.add_text_watermark(&base, options)?;

        let output = files::output_path_for(image_path);
        codec::save_image(&result, &output, self.jpeg_quality)?;
        Ok(output)
    }

    /// Add an image watermark and write `<name>_watermarked<ext>` next to `image_path`.
    pub fn add_image_watermark(
        &self,
        image_path: &Path,
        watermark_path: &Path,
        options: &WatermarkOptions,
    ) -> Result<PathBuf> {
        files::validate_image(image_path)?;
        files::validate_image(watermark_path)
            .map_err(|e| AppError::InvalidWatermark(Box::new(e)))?;
        let base = codec::load_image_file(image_path)?;

        let result = self
            .watermarker
            .add_image_watermark(&base, watermark_path, options)?;

        let output = files::output_path_for(image_path);
        codec::save_image(&result, &output, self.jpeg_quality)?;
        Ok(output)
    }

    pub fn image_preview(&self, path: &Path) -> Result<String> {
        codec::image_preview(path)
    }

    pub fn supported_formats(&self) -> Vec<String> {
        SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect()
    }

    /// Remove staged uploads.
    pub fn shutdown(&self) {
        if let Err(e) = self.temp.cleanup() {
            tracing::warn!("Failed to clean up temp files: {e}");
        }
    }
}
