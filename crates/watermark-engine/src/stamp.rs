//! Image watermarks: scale a decoded watermark and stamp it onto a copy of the base.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::compose::blend;
use crate::options::WatermarkOptions;
use crate::tile::layout;
use crate::{Result, invalid};

/// Decode watermark bytes, auto-detecting the format.
pub fn decode_watermark(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Extent of `img` multiplied by `scale`, truncated to whole pixels.
///
/// Fails when the scale is not positive or either side ends up empty.
pub fn scaled_extent(img: &DynamicImage, scale: f64) -> Result<(u32, u32)> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(invalid(format!("scale must be positive, got {scale}")));
    }
    let w = (f64::from(img.width()) * scale) as u32;
    let h = (f64::from(img.height()) * scale) as u32;
    if w == 0 || h == 0 {
        return Err(invalid(format!(
            "scale {scale} reduces {}x{} watermark to {w}x{h}",
            img.width(),
            img.height()
        )));
    }
    Ok((w, h))
}

/// Resample the watermark to `width` x `height` with bilinear filtering.
///
/// Returns a plain RGBA copy when the size already matches.
pub fn resize_watermark(img: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if (orig_w, orig_h) == (width, height) {
        debug!(width, height, "Watermark already at target size, skipping resize");
        return img.to_rgba8();
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Resizing watermark"
    );

    img.resize_exact(width, height, FilterType::Triangle).to_rgba8()
}

/// Composite `watermark` onto a copy of `base` according to `opts`.
///
/// Options are checked before the base is copied, so an invalid call touches
/// no pixels at all.
pub fn render_image(
    base: &DynamicImage,
    watermark: &DynamicImage,
    opts: &WatermarkOptions,
) -> Result<RgbaImage> {
    opts.check_scale()?;
    let (wm_w, wm_h) = scaled_extent(watermark, opts.scale)?;
    let origins = layout(
        i64::from(base.width()),
        i64::from(base.height()),
        i64::from(wm_w),
        i64::from(wm_h),
        opts,
    )?;

    let mut canvas = base.to_rgba8();
    let scaled = resize_watermark(watermark, wm_w, wm_h);

    let mut stamped = 0usize;
    for (x, y) in origins {
        blend(&mut canvas, &scaled, x, y, opts.opacity);
        stamped += 1;
    }
    debug!(wm_w, wm_h, stamped, "Image watermark applied");

    Ok(canvas)
}
