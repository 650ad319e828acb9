//! Text watermarks.
//!
//! Text is measured once, placed with the shared layout, and drawn through a
//! [`GlyphRenderer`]. The `ab_glyph` fonts implement it directly; anything else
//! that can measure and rasterize a run of text can stand in for them.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::pixelops::weighted_sum;
use tracing::debug;

use crate::options::WatermarkOptions;
use crate::tile::layout;
use crate::{Result, WatermarkError};

/// Glyph measuring and drawing service used by the text renderer.
pub trait GlyphRenderer {
    /// Rendered width of `text` at `size` pixels, rounded to whole pixels.
    ///
    /// `size` is the em size, as in a point size rendered at 72 DPI.
    fn measure_text(&self, text: &str, size: f32) -> u32;

    /// Draw `text` with its baseline starting at `baseline`.
    ///
    /// Pixels outside `canvas` are skipped. Fails if a character cannot be rendered.
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size: f32,
        color: Rgba<u8>,
        baseline: (i64, i64),
    ) -> Result<()>;
}

impl GlyphRenderer for FontVec {
    fn measure_text(&self, text: &str, size: f32) -> u32 {
        measure_text_width(self, em_scale(self, size), text)
    }

    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        size: f32,
        color: Rgba<u8>,
        baseline: (i64, i64),
    ) -> Result<()> {
        draw_glyph_run(self, canvas, em_scale(self, size), text, color, baseline)
    }
}

/// Scale at which one em of `font` spans `size` pixels.
///
/// `PxScale` measures ascent to descent, which is taller than the em square
/// for most fonts.
pub fn em_scale<F: Font>(font: &F, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
        _ => PxScale::from(size),
    }
}

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.round() as u32
}

/// Rasterize `text` onto `canvas` with the baseline origin at `(x, y)`.
///
/// Coverage `c` is blended as `color * c + dst * (1 - alpha * c)`: the colour's
/// RGB is taken as already premultiplied, only the destination is attenuated
/// by the colour's alpha.
fn draw_glyph_run<F: Font>(
    font: &F,
    canvas: &mut RgbaImage,
    scale: PxScale,
    text: &str,
    color: Rgba<u8>,
    (x, y): (i64, i64),
) -> Result<()> {
    let scaled = font.as_scaled(scale);
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let alpha = f32::from(color[3]) / 255.0;

    let mut caret = x as f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if glyph_id.0 == 0 && !ch.is_whitespace() && !ch.is_control() {
            return Err(WatermarkError::GlyphRender { ch });
        }
        if let Some(prev) = prev_glyph {
            caret += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(scale, point(caret, y as f32));
        caret += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);

        // Whitespace has no outline.
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);

        outlined.draw(|gx, gy, coverage| {
            let px = left.saturating_add(i64::from(gx));
            let py = top.saturating_add(i64::from(gy));
            if (0..width).contains(&px) && (0..height).contains(&py) {
                let c = coverage.clamp(0.0, 1.0);
                let dst = canvas.get_pixel_mut(px as u32, py as u32);
                *dst = weighted_sum(*dst, color, 1.0 - alpha * c, c);
            }
        });
    }

    Ok(())
}

/// Draw `opts.text` onto a copy of `base`.
///
/// The unit is `measured width` x `floor(text_size)`; the baseline sits one
/// unit height below each placement origin. A failed draw aborts the whole
/// call and no image is returned.
pub fn render_text<G>(glyphs: &G, base: &DynamicImage, opts: &WatermarkOptions) -> Result<RgbaImage>
where
    G: GlyphRenderer + ?Sized,
{
    opts.check_text()?;

    let size = opts.text_size as f32;
    let text_w = i64::from(glyphs.measure_text(&opts.text, size));
    let text_h = opts.text_size as i64;
    let origins = layout(
        i64::from(base.width()),
        i64::from(base.height()),
        text_w,
        text_h,
        opts,
    )?;

    let mut canvas = base.to_rgba8();
    let color = opts.text_color.with_opacity(opts.opacity);

    let mut drawn = 0usize;
    for (x, y) in origins {
        let baseline = (x, y.saturating_add(text_h));
        glyphs.draw_text(&mut canvas, &opts.text, size, color, baseline)?;
        drawn += 1;
    }
    debug!(text_w, text_h, drawn, "Text watermark applied");

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Position, TextColor};
    use std::cell::RefCell;

    const DEJAVU_SANS: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ];

    /// Glyph service with a fixed advance per character that records every draw.
    struct FakeGlyphs {
        advance: u32,
        fail_on: Option<char>,
        draws: RefCell<Vec<((i64, i64), Rgba<u8>)>>,
    }

    impl FakeGlyphs {
        fn new(advance: u32) -> Self {
            Self {
                advance,
                fail_on: None,
                draws: RefCell::new(Vec::new()),
            }
        }

        fn baselines(&self) -> Vec<(i64, i64)> {
            self.draws.borrow().iter().map(|(b, _)| *b).collect()
        }
    }

    impl GlyphRenderer for FakeGlyphs {
        fn measure_text(&self, text: &str, _size: f32) -> u32 {
            self.advance * text.chars().count() as u32
        }

        fn draw_text(
            &self,
            canvas: &mut RgbaImage,
            text: &str,
            _size: f32,
            color: Rgba<u8>,
            baseline: (i64, i64),
        ) -> Result<()> {
            if let Some(ch) = self.fail_on.filter(|c| text.contains(*c)) {
                return Err(WatermarkError::GlyphRender { ch });
            }
            let (x, y) = baseline;
            let inside_x = (0..i64::from(canvas.width())).contains(&x);
            let inside_y = (1..=i64::from(canvas.height())).contains(&y);
            if inside_x && inside_y {
                canvas.put_pixel(x as u32, y as u32 - 1, color);
            }
            self.draws.borrow_mut().push((baseline, color));
            Ok(())
        }
    }

    fn blank(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    fn text_opts(text: &str, size: f64) -> WatermarkOptions {
        WatermarkOptions::new()
            .with_text(text)
            .with_text_size(size)
            .with_text_color(TextColor::new(0, 0, 0, 255))
            .with_opacity(1.0)
    }

    #[test]
    fn center_anchor_for_forty_by_twelve() {
        let glyphs = FakeGlyphs::new(10);
        let opts = text_opts("ABCD", 12.0).with_position(Position::Center);
        render_text(&glyphs, &blank(100, 100), &opts).unwrap();
        // Anchor (30, 44); baseline one text height lower.
        assert_eq!(glyphs.baselines(), vec![(30, 56)]);
    }

    #[test]
    fn fractional_size_height_is_floored() {
        let glyphs = FakeGlyphs::new(10);
        let opts = text_opts("ABCD", 12.9).with_position(Position::TopLeft);
        render_text(&glyphs, &blank(100, 100), &opts).unwrap();
        assert_eq!(glyphs.baselines(), vec![(0, 12)]);
    }

    #[test]
    fn tiled_draws_once_per_grid_cell() {
        let glyphs = FakeGlyphs::new(10);
        let opts = text_opts("AB", 10.0)
            .with_position(Position::Tiled)
            .with_spacing(10.0);
        render_text(&glyphs, &blank(100, 50), &opts).unwrap();

        let baselines = glyphs.baselines();
        assert_eq!(baselines.len(), 12);
        assert_eq!(baselines[0], (0, 10));
        assert_eq!(baselines[3], (90, 10));
        assert_eq!(baselines[11], (90, 50));
    }

    #[test]
    fn color_alpha_comes_from_opacity() {
        let glyphs = FakeGlyphs::new(10);
        let opts = text_opts("A", 10.0)
            .with_text_color(TextColor::new(200, 100, 50, 255))
            .with_opacity(0.5)
            .with_position(Position::TopLeft);
        render_text(&glyphs, &blank(20, 20), &opts).unwrap();
        assert_eq!(glyphs.draws.borrow()[0].1, Rgba([200, 100, 50, 127]));
    }

    #[test]
    fn base_image_is_not_mutated() {
        let glyphs = FakeGlyphs::new(10);
        let base = blank(20, 20);
        let before = base.to_rgba8();
        let opts = text_opts("A", 10.0).with_position(Position::TopLeft);
        let out = render_text(&glyphs, &base, &opts).unwrap();

        assert_eq!(base.to_rgba8(), before);
        assert_ne!(out, before);
    }

    #[test]
    fn draw_failure_aborts_operation() {
        let mut glyphs = FakeGlyphs::new(10);
        glyphs.fail_on = Some('X');
        let opts = text_opts("AXB", 10.0)
            .with_position(Position::Tiled)
            .with_spacing(5.0);
        let err = render_text(&glyphs, &blank(100, 100), &opts).unwrap_err();
        assert!(matches!(err, WatermarkError::GlyphRender { ch: 'X' }));
        assert!(glyphs.draws.borrow().is_empty());
    }

    #[test]
    fn invalid_size_rejected_before_drawing() {
        let glyphs = FakeGlyphs::new(10);
        let opts = text_opts("A", 0.0);
        let err = render_text(&glyphs, &blank(20, 20), &opts).unwrap_err();
        assert!(matches!(err, WatermarkError::InvalidOptions(_)));
        assert!(glyphs.draws.borrow().is_empty());
    }

    #[test]
    fn maximum_margin_places_text_off_canvas() {
        let glyphs = FakeGlyphs::new(10);
        let base = blank(20, 20);
        let opts = text_opts("AB", 10.0)
            .with_position(Position::TopLeft)
            .with_margin(i32::MAX);
        let out = render_text(&glyphs, &base, &opts).unwrap();

        let max = i64::from(i32::MAX);
        assert_eq!(glyphs.baselines(), vec![(max, max + 10)]);
        assert_eq!(out, base.to_rgba8());
    }

    #[test]
    fn font_size_is_em_size() {
        // Skipped on hosts without DejaVu Sans.
        let Some(font) = DEJAVU_SANS
            .iter()
            .find_map(|p| std::fs::read(p).ok())
            .and_then(|data| FontVec::try_from_vec(data).ok())
        else {
            return;
        };

        let upem = font.units_per_em().unwrap();
        let m = font.glyph_id('M');
        let expected = (font.h_advance_unscaled(m) * 100.0 / upem).round() as u32;
        assert_eq!(font.measure_text("M", 100.0), expected);
        // DejaVu Sans: 1767 / 2048 units.
        assert_eq!(font.measure_text("M", 100.0), 86);
    }

    #[test]
    fn empty_tiled_text_without_spacing_is_rejected() {
        let glyphs = FakeGlyphs::new(10);
        let opts = text_opts("", 10.0).with_position(Position::Tiled);
        let err = render_text(&glyphs, &blank(20, 20), &opts).unwrap_err();
        assert!(matches!(err, WatermarkError::InvalidOptions(_)));
    }
}
