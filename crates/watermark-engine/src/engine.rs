//! The watermarking facade.

use std::path::Path;

use ab_glyph::FontVec;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::options::WatermarkOptions;
use crate::text::GlyphRenderer;
use crate::{Result, WatermarkError, stamp, text};

/// Applies text and image watermarks with a single, read-only glyph source.
///
/// Every operation returns a new buffer; the caller's image is never modified.
pub struct Watermarker<G = FontVec> {
    glyphs: G,
}

impl Watermarker {
    /// Parse TTF/OTF font data.
    pub fn new(font_data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(font_data).map_err(|_| WatermarkError::InvalidFont)?;
        Ok(Self::with_glyphs(font))
    }
}

impl<G: GlyphRenderer> Watermarker<G> {
    /// Use any glyph renderer for text watermarks.
    pub fn with_glyphs(glyphs: G) -> Self {
        Self { glyphs }
    }

    /// Draw `opts.text` onto a copy of `base`.
    pub fn add_text_watermark(
        &self,
        base: &DynamicImage,
        opts: &WatermarkOptions,
    ) -> Result<RgbaImage> {
        text::render_text(&self.glyphs, base, opts)
    }

    /// Stamp the image stored at `watermark_path` onto a copy of `base`.
    pub fn add_image_watermark(
        &self,
        base: &DynamicImage,
        watermark_path: impl AsRef<Path>,
        opts: &WatermarkOptions,
    ) -> Result<RgbaImage> {
        let path = watermark_path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| WatermarkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), len = bytes.len(), "Loaded watermark image");
        self.add_image_watermark_bytes(base, &bytes, opts)
    }

    /// Stamp an encoded watermark (JPEG/PNG/BMP bytes) onto a copy of `base`.
    pub fn add_image_watermark_bytes(
        &self,
        base: &DynamicImage,
        watermark: &[u8],
        opts: &WatermarkOptions,
    ) -> Result<RgbaImage> {
        let watermark = stamp::decode_watermark(watermark)?;
        self.add_image_watermark_from(base, &watermark, opts)
    }

    /// Stamp an already decoded watermark onto a copy of `base`.
    pub fn add_image_watermark_from(
        &self,
        base: &DynamicImage,
        watermark: &DynamicImage,
        opts: &WatermarkOptions,
    ) -> Result<RgbaImage> {
        stamp::render_image(base, watermark, opts)
    }
}

impl<G> std::fmt::Debug for Watermarker<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watermarker").finish_non_exhaustive()
    }
}
