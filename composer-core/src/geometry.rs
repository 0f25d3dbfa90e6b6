//! Value types for canvas geometry and color.

use serde::{Deserialize, Serialize};

/// RGBA color. Channels are 0-255, alpha is a fraction in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    #[serde(default)]
    pub r: u8,
    /// Green channel.
    #[serde(default)]
    pub g: u8,
    /// Blue channel.
    #[serde(default)]
    pub b: u8,
    /// Alpha as a fraction.
    #[serde(default = "Color::default_alpha")]
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create a color with the given alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    const fn default_alpha() -> f32 {
        1.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Axis-aligned rectangle in canvas pixels, origin top-left.
///
/// Position is signed so elements may sit partly or fully off-canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// X position (pixels from left).
    pub x: i32,
    /// Y position (pixels from top).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Bounds {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Copy of this rectangle moved to `(x, y)` with the same size.
    #[must_use]
    pub const fn at(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Check if a point lies within this rectangle (edges inclusive).
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // edges are well within f64 precision
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= f64::from(self.x)
            && x <= self.right() as f64
            && y >= f64::from(self.y)
            && y <= self.bottom() as f64
    }

    /// Check if `other` lies entirely within this rectangle.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Round a pixel coordinate to the nearest integer, saturating at the `i32` range.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // clamped to the i32 range first
pub fn round_px(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value
        .round()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_defaults_to_opaque() {
        let color: Color = serde_json::from_str(r#"{"r":10,"g":20,"b":30}"#).expect("parse");
        assert_eq!(color, Color::rgb(10, 20, 30));
    }

    #[test]
    fn test_bounds_edges_and_containment() {
        let outer = Bounds::new(0, 0, 100, 100);
        let inner = Bounds::new(10, 10, 90, 90);
        assert_eq!(inner.right(), 100);
        assert!(outer.contains(&inner));
        assert!(!outer.contains(&inner.at(11, 10)));
        assert!(outer.contains_point(100.0, 0.0));
        assert!(!outer.contains_point(-0.5, 50.0));
    }

    #[test]
    fn test_round_px() {
        assert_eq!(round_px(399.6), 400);
        assert_eq!(round_px(-2.5), -3);
        assert_eq!(round_px(f64::NAN), 0);
        assert_eq!(round_px(1e12), i32::MAX);
    }
}
