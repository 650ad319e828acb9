//! Tiled layout iteration.
//!
//! The grid is laid out axis-aligned. Rotation is applied to each cell's origin
//! separately (about that cell's centre), not to the grid as a whole.

use tracing::debug;

use crate::geometry::{anchor_position, rotate_point};
use crate::options::{Position, WatermarkOptions};
use crate::{Result, invalid};

/// Every placement origin for a `unit_w` x `unit_h` unit under `opts`.
///
/// Tiled layouts walk a [`TileGrid`]; every other position yields a single
/// anchor. Either way each origin is already rotated about its unit's centre.
/// An invalid tile step is reported here, before any pixel is written.
pub fn layout(
    base_w: i64,
    base_h: i64,
    unit_w: i64,
    unit_h: i64,
    opts: &WatermarkOptions,
) -> Result<Box<dyn Iterator<Item = (i64, i64)>>> {
    let margin = i64::from(opts.margin);
    if opts.position == Position::Tiled {
        let grid = TileGrid::new(base_w, base_h, unit_w, unit_h, opts.spacing, margin)?;
        debug!(step = ?grid.step(), unit_w, unit_h, "Tiled layout");
        return Ok(Box::new(grid.placements(opts.angle)));
    }

    let (x, y) = anchor_position(base_w, base_h, unit_w, unit_h, opts.position, margin);
    let origin = rotate_about_centre(x, y, unit_w, unit_h, opts.angle);
    debug!(position = opts.position.as_str(), ?origin, "Single layout");
    Ok(Box::new(std::iter::once(origin)))
}

fn rotate_about_centre(x: i64, y: i64, unit_w: i64, unit_h: i64, angle: f64) -> (i64, i64) {
    let (cx, cy) = (x.saturating_add(unit_w / 2), y.saturating_add(unit_h / 2));
    rotate_point(x, y, cx, cy, angle)
}

/// Lazy row-major sequence of tile origins covering the base image.
///
/// Starts at `(margin, margin)` and steps by `spacing + unit` along each axis
/// while the origin is still inside the base image. Cloning a fresh grid
/// restarts the sequence.
#[derive(Debug, Clone)]
pub struct TileGrid {
    margin: i64,
    step_x: i64,
    step_y: i64,
    bound_w: i64,
    bound_h: i64,
    unit_w: i64,
    unit_h: i64,
    next: Option<(i64, i64)>,
}

impl TileGrid {
    /// Build a grid for a `unit_w` x `unit_h` unit on a `base_w` x `base_h` image.
    ///
    /// `spacing` is truncated to whole pixels. Both steps must be positive and
    /// representable, otherwise iteration would never advance.
    pub fn new(
        base_w: i64,
        base_h: i64,
        unit_w: i64,
        unit_h: i64,
        spacing: f64,
        margin: i64,
    ) -> Result<Self> {
        let gap = spacing as i64;
        let (step_x, step_y) = match (gap.checked_add(unit_w), gap.checked_add(unit_h)) {
            (Some(sx), Some(sy)) if sx > 0 && sy > 0 => (sx, sy),
            _ => {
                return Err(invalid(format!(
                    "tile step must be positive and finite (spacing {spacing}, unit {unit_w}x{unit_h})"
                )));
            }
        };

        let next = (margin < base_w && margin < base_h).then_some((margin, margin));
        Ok(Self {
            margin,
            step_x,
            step_y,
            bound_w: base_w,
            bound_h: base_h,
            unit_w,
            unit_h,
            next,
        })
    }

    /// Horizontal and vertical distance between consecutive origins.
    pub fn step(&self) -> (i64, i64) {
        (self.step_x, self.step_y)
    }

    /// Origins rotated by `angle` degrees about each cell's own centre.
    pub fn placements(self, angle: f64) -> impl Iterator<Item = (i64, i64)> {
        let (unit_w, unit_h) = (self.unit_w, self.unit_h);
        self.map(move |(x, y)| rotate_about_centre(x, y, unit_w, unit_h, angle))
    }
}

impl Iterator for TileGrid {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let (x, y) = self.next?;

        let bound_w = self.bound_w;
        let bound_h = self.bound_h;
        self.next = match x.checked_add(self.step_x).filter(|nx| *nx < bound_w) {
            Some(nx) => Some((nx, y)),
            None => y
                .checked_add(self.step_y)
                .filter(|ny| *ny < bound_h)
                .map(|ny| (self.margin, ny)),
        };

        Some((x, y))
    }
}
