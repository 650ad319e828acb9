//! Watermarking application shell.
//!
//! Wraps the watermark engine with file validation, image encoding,
//! upload staging and font discovery.

pub mod app;
pub mod config;
pub mod error;
pub mod services;

pub use app::App;
pub use config::AppConfig;
pub use error::{AppError, Result};

use watermark_engine::Watermarker;

/// Load `.env` and configuration, find a font and build the [`App`].
///
/// Failing to load a font is fatal: text watermarks cannot work without one.
pub fn init_app() -> Result<App> {
    config::load_dotenv();
    let config = AppConfig::load();

    let font_data = services::font::load_font_data(config.font_path.as_deref())?;
    let watermarker = Watermarker::new(font_data)?;

    tracing::info!(
        temp_dir = %config.temp_dir.display(),
        jpeg_quality = config.jpeg_quality,
        "Watermarker ready"
    );
    Ok(App::new(watermarker, &config))
}
