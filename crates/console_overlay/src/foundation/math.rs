//! Math utilities and types
//!
//! Screen-space types used by the console: positions in pixels, RGBA colors
//! and axis-aligned rectangles.

pub use nalgebra::{Vector2, Vector4};
use serde::{Deserialize, Serialize};

/// 2D vector type (screen position, pixels)
pub type Vec2 = Vector2<f32>;

/// 4D vector type (RGBA color, 0.0-1.0)
pub type Vec4 = Vector4<f32>;

/// Axis-aligned rectangle in screen pixels (origin top-left, +Y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Shrink the rectangle by `margin` on every side
    ///
    /// Width and height never go below zero.
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: (self.w - margin * 2.0).max(0.0),
            h: (self.h - margin * 2.0).max(0.0),
        }
    }

    /// Top-left corner
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Whether the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// Convert an RGBA array (as stored in configuration) to a color vector
pub fn color_from_rgba(rgba: [f32; 4]) -> Vec4 {
    Vec4::new(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Convert 8-bit RGBA channels to a normalized color vector
pub fn color_from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Vec4 {
    Vec4::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_inset() {
        let rect = Rect::new(0.0, 0.0, 512.0, 256.0).inset(4.0);
        assert_eq!(rect, Rect::new(4.0, 4.0, 504.0, 248.0));

        let collapsed = Rect::new(0.0, 0.0, 6.0, 6.0).inset(4.0);
        assert!(collapsed.is_empty());
    }

    #[test]
    fn test_color_conversion() {
        let grey = color_from_rgba8(192, 192, 192, 255);
        assert_relative_eq!(grey.x, 192.0 / 255.0);
        assert_relative_eq!(grey.w, 1.0);
        assert_eq!(color_from_rgba([0.0, 0.5, 1.0, 1.0]), Vec4::new(0.0, 0.5, 1.0, 1.0));
    }
}
