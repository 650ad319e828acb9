//! Watermark compositing engine.
//!
//! Places text or image watermarks onto RGBA pixel buffers, either once at an
//! anchor position or tiled across the whole image, with rotation and opacity.
//! Decoding of the base image and encoding of the result are left to the caller.

pub mod compose;
pub mod engine;
pub mod geometry;
pub mod options;
pub mod stamp;
pub mod text;
pub mod tile;

// Re-exports for convenience
pub use ab_glyph::FontVec;
pub use compose::blend;
pub use engine::Watermarker;
pub use geometry::{anchor_position, rotate_point};
pub use options::{Position, TextColor, WatermarkOptions};
pub use text::GlyphRenderer;
pub use tile::TileGrid;

/// Errors that can occur while applying a watermark.
#[derive(Debug, thiserror::Error)]
pub enum WatermarkError {
    #[error("Invalid watermark image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to render glyph {ch:?} (not present in font)")]
    GlyphRender { ch: char },

    #[error("Invalid watermark options: {0}")]
    InvalidOptions(String),

    #[error("Font data could not be parsed (TTF/OTF expected)")]
    InvalidFont,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for watermark operations.
pub type Result<T> = std::result::Result<T, WatermarkError>;

pub(crate) fn invalid(msg: impl Into<String>) -> WatermarkError {
    WatermarkError::InvalidOptions(msg.into())
}
