//! Per-call watermark configuration.
//!
//! Options are plain values supplied by the caller on every invocation.
//! The engine never fills in missing settings and keeps nothing between calls.
//! Field names follow the front-end's JSON (`textSize`, `textColor`, ...).

use image::Rgba;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, invalid};

/// Where a watermark unit is placed on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum Position {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Repeated across the whole image.
    Tiled,
}

impl Position {
    /// The front-end tag for this position.
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Center => "center",
            Position::TopLeft => "topLeft",
            Position::TopRight => "topRight",
            Position::BottomLeft => "bottomLeft",
            Position::BottomRight => "bottomRight",
            Position::Tiled => "tiled",
        }
    }
}

impl From<&str> for Position {
    /// Parse a front-end tag. Unknown tags (including `""`) fall back to `Center`.
    fn from(tag: &str) -> Self {
        match tag {
            "center" => Position::Center,
            "topLeft" => Position::TopLeft,
            "topRight" => Position::TopRight,
            "bottomLeft" => Position::BottomLeft,
            "bottomRight" => Position::BottomRight,
            "tiled" => Position::Tiled,
            other => {
                debug!(tag = other, "Unrecognized position, using center");
                Position::Center
            }
        }
    }
}

impl From<String> for Position {
    fn from(tag: String) -> Self {
        Position::from(tag.as_str())
    }
}

/// Text colour as sent by the front-end (`{"R":..,"G":..,"B":..,"A":..}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextColor {
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "G")]
    pub g: u8,
    #[serde(rename = "B")]
    pub b: u8,
    #[serde(rename = "A")]
    pub a: u8,
}

impl TextColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Colour with the alpha byte replaced by `255 * opacity` (truncated).
    ///
    /// The caller's own alpha byte is discarded; RGB is kept as given.
    pub fn with_opacity(self, opacity: f64) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, (255.0 * opacity) as u8])
    }
}

/// Configuration for a single watermark operation.
///
/// The text fields are only read by text watermarks and `scale` only by
/// image watermarks. Everything else applies to both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkOptions {
    #[serde(default)]
    pub text: String,
    /// Font size in pixels.
    #[serde(default)]
    pub text_size: f64,
    #[serde(default)]
    pub text_color: TextColor,
    /// Carried for the front-end; the engine always renders with its own font.
    #[serde(default)]
    pub font_family: String,

    /// Image watermark scale factor relative to its decoded size.
    #[serde(default)]
    pub scale: f64,

    /// 0.0 (invisible) ..= 1.0 (opaque).
    pub opacity: f64,
    /// Rotation in degrees, applied to each placement origin.
    pub angle: f64,
    /// Gap between tiles in pixels (tiled layout only).
    pub spacing: f64,
    pub position: Position,
    /// Distance from the image edge in pixels.
    pub margin: i32,
}

impl WatermarkOptions {
    /// Zero-valued options. Every field the call needs must be set explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set watermark text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set font size.
    pub fn with_text_size(mut self, size: f64) -> Self {
        self.text_size = size;
        self
    }

    /// Builder: set text colour.
    pub fn with_text_color(mut self, color: TextColor) -> Self {
        self.text_color = color;
        self
    }

    /// Builder: set image scale factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Builder: set rotation angle in degrees.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Builder: set tile spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Builder: set position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Builder: set margin.
    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    pub(crate) fn check_opacity(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(invalid(format!(
                "opacity must be between 0.0 and 1.0, got {}",
                self.opacity
            )));
        }
        Ok(())
    }

    pub(crate) fn check_text(&self) -> Result<()> {
        if !(self.text_size.is_finite() && self.text_size > 0.0) {
            return Err(invalid(format!(
                "text size must be positive, got {}",
                self.text_size
            )));
        }
        self.check_opacity()
    }

    pub(crate) fn check_scale(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(invalid(format!("scale must be positive, got {}", self.scale)));
        }
        self.check_opacity()
    }
}
