//! Pixel compositing for image watermarks.

use image::{Rgba, RgbaImage};

/// Write `src` onto `dst` with its top-left corner at `(x, y)`, scaling every
/// source alpha by `opacity`.
///
/// Each covered destination pixel is replaced by the faded source pixel, so
/// overlapping tiles behave like repeated overwrites. Source pixels that land
/// outside `dst` are skipped.
///
/// The colour channels are written straight (not premultiplied by the faded
/// alpha), so transparent areas of the watermark keep their RGB.
pub fn blend(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, opacity: f64) {
    let (dst_w, dst_h) = (i64::from(dst.width()), i64::from(dst.height()));
    let (src_w, src_h) = (i64::from(src.width()), i64::from(src.height()));

    // Clip the source rectangle against the destination.
    let px_start = x.saturating_neg().clamp(0, src_w);
    let px_end = dst_w.saturating_sub(x).clamp(0, src_w);
    let py_start = y.saturating_neg().clamp(0, src_h);
    let py_end = dst_h.saturating_sub(y).clamp(0, src_h);

    for py in py_start..py_end {
        for px in px_start..px_end {
            let pixel = src.get_pixel(px as u32, py as u32);
            dst.put_pixel((x + px) as u32, (y + py) as u32, fade(pixel, opacity));
        }
    }
}

/// Scale alpha by `opacity` at 16-bit precision, then narrow back to 8 bits.
fn fade(pixel: &Rgba<u8>, opacity: f64) -> Rgba<u8> {
    let alpha = f64::from(u32::from(pixel[3]) * 257);
    let alpha = (alpha * opacity) as u32 >> 8;
    Rgba([pixel[0], pixel[1], pixel[2], alpha.min(255) as u8])
}
