//! Placement geometry: anchor positions and point rotation.

use std::f64::consts::PI;

use crate::options::Position;

/// Top-left origin for a `unit_w` x `unit_h` watermark on a `base_w` x `base_h` image.
///
/// No clamping is done. A unit larger than the base yields negative
/// coordinates; the pixels that fall outside are dropped when drawing.
/// Arithmetic saturates instead of overflowing.
pub fn anchor_position(
    base_w: i64,
    base_h: i64,
    unit_w: i64,
    unit_h: i64,
    position: Position,
    margin: i64,
) -> (i64, i64) {
    let far_x = base_w.saturating_sub(unit_w).saturating_sub(margin);
    let far_y = base_h.saturating_sub(unit_h).saturating_sub(margin);
    match position {
        Position::TopLeft => (margin, margin),
        Position::TopRight => (far_x, margin),
        Position::BottomLeft => (margin, far_y),
        Position::BottomRight => (far_x, far_y),
        // Tiled has no single anchor; centre is the fallback for it as well.
        Position::Center | Position::Tiled => (
            base_w.saturating_sub(unit_w) / 2,
            base_h.saturating_sub(unit_h) / 2,
        ),
    }
}

/// Rotate `(x, y)` about `(cx, cy)` by `angle` degrees.
///
/// The rotated offsets are truncated toward zero, not rounded.
pub fn rotate_point(x: i64, y: i64, cx: i64, cy: i64, angle: f64) -> (i64, i64) {
    let rad = angle * PI / 180.0;
    let (sin, cos) = rad.sin_cos();

    let nx = x.saturating_sub(cx) as f64;
    let ny = y.saturating_sub(cy) as f64;

    let rx = nx * cos - ny * sin;
    let ry = nx * sin + ny * cos;

    ((rx as i64).saturating_add(cx), (ry as i64).saturating_add(cy))
}
