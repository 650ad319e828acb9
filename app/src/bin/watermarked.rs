//! Headless binary: applies one watermark from the command line.
//!
//! Usage: `watermarked <options.json> <image> [watermark-image]`
//!
//! Without a watermark image the text in the options is drawn; with one the
//! image is stamped instead. The output is written next to `<image>`.

use std::path::PathBuf;

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;

use watermark_engine::WatermarkOptions;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options_path, image_path, watermark_path) = match args.as_slice() {
        [opts, image] => (PathBuf::from(opts), PathBuf::from(image), None),
        [opts, image, mark] => (
            PathBuf::from(opts),
            PathBuf::from(image),
            Some(PathBuf::from(mark)),
        ),
        _ => bail!("usage: watermarked <options.json> <image> [watermark-image]"),
    };

    let raw = std::fs::read_to_string(&options_path)
        .with_context(|| format!("failed to read {}", options_path.display()))?;
    let options: WatermarkOptions =
        serde_json::from_str(&raw).context("failed to parse watermark options")?;

    let app = watermarked_lib::init_app()?;

    let result = match &watermark_path {
        Some(mark) => app.add_image_watermark(&image_path, mark, &options),
        None => app.add_text_watermark(&image_path, &options),
    };
    app.shutdown();

    let output = result?;
    tracing::info!(output = %output.display(), "Watermark added");
    println!("{}", output.display());
    Ok(())
}
