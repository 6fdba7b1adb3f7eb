//! Console renderer that turns console state into backend draw calls
//!
//! One redraw clears the surface, draws the visible output rows above a
//! fixed input row, then draws the prompt followed by the input line. The
//! input starts where the measured prompt ends.

use std::error::Error;

use super::backend::ConsoleRenderBackend;
use super::layout;
use super::model::Console;
use crate::config::ConsoleStyleConfig;
use crate::foundation::math::{color_from_rgba, Rect, Vec2, Vec4};

/// Console renderer
///
/// Tracks whether a redraw is needed so hosts can skip frames where nothing
/// changed.
#[derive(Debug, Clone)]
pub struct ConsoleRenderer {
    text_color: Vec4,
    background_color: Vec4,
    prompt_background_color: Vec4,

    /// Whether the console needs to be redrawn
    dirty: bool,

    /// Last known surface dimensions (for detecting resize)
    last_surface_width: u32,
    last_surface_height: u32,
}

impl ConsoleRenderer {
    /// Create a renderer with the default colors
    pub fn new() -> Self {
        Self::from_style(&ConsoleStyleConfig::default())
    }

    /// Create a renderer with configured colors
    pub fn from_style(style: &ConsoleStyleConfig) -> Self {
        Self {
            text_color: color_from_rgba(style.text_color),
            background_color: color_from_rgba(style.background_color),
            prompt_background_color: color_from_rgba(style.prompt_background_color),
            dirty: true,
            last_surface_width: 0,
            last_surface_height: 0,
        }
    }

    /// Mark the console as needing a redraw
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if the console needs a redraw
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if surface dimensions have changed and update internal state
    pub fn check_surface_changed(&mut self, width: u32, height: u32) -> bool {
        let changed = self.last_surface_width != width || self.last_surface_height != height;

        if changed {
            self.last_surface_width = width;
            self.last_surface_height = height;
            self.dirty = true;
        }

        changed
    }

    /// Rectangle available to the output log on a surface of the given size
    ///
    /// The surface inset by the console margin, minus the input row at the
    /// bottom.
    pub fn output_rect(console: &Console, width: u32, height: u32) -> Rect {
        let mut rect = Rect::new(0.0, 0.0, width as f32, height as f32).inset(console.margin());
        rect.h = (rect.h - console.font_size() as f32).max(0.0);
        rect
    }

    /// Rectangle of the prompt and input row
    pub fn input_row_rect(console: &Console, width: u32, height: u32) -> Rect {
        let row_height = console.font_size() as f32;
        Rect::new(
            0.0,
            height as f32 - console.margin() - row_height,
            width as f32,
            row_height,
        )
    }

    /// Redraw the console
    pub fn render<B>(&mut self, console: &Console, backend: &mut B) -> Result<(), Box<dyn Error>>
    where
        B: ConsoleRenderBackend + ?Sized,
    {
        let (width, height) = backend.surface_size();
        self.check_surface_changed(width, height);

        let font = console.font();
        let font_size = console.font_size();

        backend.begin_console_pass(self.background_color)?;

        let placements = console.visible_layout(Self::output_rect(console, width, height), &*backend);
        for placement in &placements {
            backend.draw_run(font, font_size, placement.position, &placement.text, self.text_color)?;
        }

        let input_row = Self::input_row_rect(console, width, height);
        backend.fill_rect(input_row, self.prompt_background_color)?;

        let prompt_origin = Vec2::new(console.margin(), input_row.y);
        let input_line = layout::input_line_layout(
            console.prompt().as_slice(),
            console.input().as_slice(),
            prompt_origin,
            font,
            font_size,
            &*backend,
        );
        for placement in &input_line {
            backend.draw_run(font, font_size, placement.position, &placement.text, self.text_color)?;
        }

        backend.end_console_pass()?;

        self.dirty = false;
        Ok(())
    }

    /// Redraw only when something changed since the last redraw
    ///
    /// Returns whether a redraw happened.
    pub fn render_if_dirty<B>(
        &mut self,
        console: &Console,
        backend: &mut B,
    ) -> Result<bool, Box<dyn Error>>
    where
        B: ConsoleRenderBackend + ?Sized,
    {
        let (width, height) = backend.surface_size();
        if !self.check_surface_changed(width, height) && !self.dirty {
            return Ok(false);
        }
        self.render(console, backend)?;
        Ok(true)
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}
