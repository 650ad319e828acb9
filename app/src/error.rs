//! Application-level errors.

use watermark_engine::WatermarkError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File does not exist: {0}")]
    NotFound(String),

    #[error("Path points to a directory, not a file: {0}")]
    NotAFile(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid watermark image: {0}")]
    InvalidWatermark(Box<AppError>),

    #[error("Failed to load image: {0}")]
    Load(#[source] image::ImageError),

    #[error("Failed to add watermark: {0}")]
    Watermark(#[from] WatermarkError),

    #[error("Failed to save image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("No usable font: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
