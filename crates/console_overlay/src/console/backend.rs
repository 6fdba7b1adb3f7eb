//! Console Render Backend Traits
//!
//! Defines the interface between the console and the host graphics library.
//! Keeps the console independent of how surfaces, fonts and glyphs are
//! managed: the console only needs to measure runs of text and ask for them
//! to be drawn.

use std::error::Error;

use crate::foundation::math::{Rect, Vec2, Vec4};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while the host provisions fonts
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    LoadError(String),

    /// Font file does not exist
    #[error("Font not found: {0}")]
    NotFound(String),
}

/// Opaque font handle issued by the host backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontId(pub u32);

impl FontId {
    /// Handle of the host's built-in font
    pub const DEFAULT: Self = Self(0);
}

/// Bounding box of a measured run of text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl TextBounds {
    /// Calculate width of bounding box
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Calculate height of bounding box
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Minimum extent as a vector
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_y)
    }

    /// Maximum extent as a vector
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.max_x, self.max_y)
    }
}

/// Glyph-width oracle
///
/// Measures the rendered extent of an already encoded run of text. The layout
/// engine only uses `max_x` of the result, with the run starting at x = 0.
/// Implementations must be able to measure any non-empty run, including a
/// single character.
pub trait TextMeasurer {
    /// Measure `text` rendered with `font` at `font_size` pixels
    fn measure_run(&self, font: FontId, font_size: u32, text: &str) -> TextBounds;
}

/// Backend-agnostic console rendering interface
///
/// Implemented by the host graphics layer. One redraw is bracketed by
/// [`begin_console_pass`](Self::begin_console_pass) and
/// [`end_console_pass`](Self::end_console_pass); coordinates are pixels with
/// the origin at the top-left of the console surface.
pub trait ConsoleRenderBackend: TextMeasurer {
    /// Size of the console surface (width, height) in pixels
    fn surface_size(&self) -> (u32, u32);

    /// Begin a redraw, clearing the surface to `clear_color`
    fn begin_console_pass(&mut self, clear_color: Vec4) -> Result<(), Box<dyn Error>>;

    /// Fill a solid rectangle
    fn fill_rect(&mut self, rect: Rect, color: Vec4) -> Result<(), Box<dyn Error>>;

    /// Draw a run of text with its top-left corner at `position`
    ///
    /// Returns the x coordinate immediately after the run.
    fn draw_run(
        &mut self,
        font: FontId,
        font_size: u32,
        position: Vec2,
        text: &str,
        color: Vec4,
    ) -> Result<f32, Box<dyn Error>>;

    /// Finish the redraw
    fn end_console_pass(&mut self) -> Result<(), Box<dyn Error>>;

    /// Load a font from a file path
    fn load_font(&mut self, path: &str) -> FontResult<FontId>;

    /// Provision the host's built-in font at `font_size`
    fn default_font(&mut self, font_size: u32) -> FontId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_calculation() {
        let bounds = TextBounds {
            min_x: 0.0,
            min_y: -2.0,
            max_x: 100.0,
            max_y: 12.0,
        };

        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 14.0);
        assert_eq!(bounds.max(), Vec2::new(100.0, 12.0));
    }
}
