//! Console text layout
//!
//! Turns the output log into positioned text runs for one redraw. The log is
//! scanned backward from its end, one newline-delimited logical line at a
//! time, so the cost of a redraw is bounded by what is visible rather than by
//! the length of the history.
//!
//! Rows are counted from the bottom of the rectangle. Row 1 sits on the bottom
//! edge when the scroll offset is zero; scrolling back by one font size moves
//! the bottom edge to row 2, and so on.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::backend::{FontId, TextMeasurer};
use crate::foundation::math::{Rect, Vec2};
use crate::text::{run_to_string, to_char};

const NEWLINE: u32 = '\n' as u32;

/// Line wrapping of the output area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Break logical lines wider than the rectangle at code point boundaries
    #[default]
    Char,
    /// Never wrap; overlong lines run past the right edge
    None,
}

/// One run of text positioned for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Text of the run
    pub text: String,
    /// Top-left corner of the run in pixels
    pub position: Vec2,
}

/// Parameters of one layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRequest {
    /// Target rectangle in pixels
    pub rect: Rect,
    /// Scroll offset in pixels; positive values show older lines
    pub scroll_offset: i32,
    /// Font used for measurement
    pub font: FontId,
    /// Font size in pixels, also the row height
    pub font_size: u32,
    /// Wrapping behavior
    pub wrap: WrapMode,
}

impl LayoutRequest {
    /// Create an unscrolled, wrapping request
    pub fn new(rect: Rect, font: FontId, font_size: u32) -> Self {
        Self {
            rect,
            scroll_offset: 0,
            font,
            font_size,
            wrap: WrapMode::Char,
        }
    }

    /// Set the scroll offset
    pub fn with_scroll_offset(mut self, scroll_offset: i32) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    /// Set the wrap mode
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }
}

/// Number of rows that fit in `rect_height`, counting a partial row
pub fn visible_line_count(rect_height: f32, font_size: u32) -> i32 {
    if font_size == 0 || rect_height <= 0.0 {
        return 0;
    }
    (rect_height / font_size as f32).ceil() as i32
}

/// Number of newline-delimited lines in `text`
///
/// A trailing newline ends the last line rather than starting a new one.
pub fn logical_line_count(text: &[u32]) -> usize {
    if text.is_empty() {
        return 0;
    }
    let newlines = text.iter().filter(|&&c| c == NEWLINE).count();
    if text.last() == Some(&NEWLINE) {
        newlines
    } else {
        newlines + 1
    }
}

/// A logical line re-encoded for measurement
///
/// `boundaries[i]` is the byte offset of code point `i`; the final entry is
/// the length of `text`. Slicing between two boundaries always yields whole
/// characters.
struct LineRun {
    text: String,
    boundaries: Vec<usize>,
}

impl LineRun {
    fn new(codepoints: &[u32]) -> Self {
        let mut text = String::with_capacity(codepoints.len());
        let mut boundaries = Vec::with_capacity(codepoints.len() + 1);
        for &codepoint in codepoints {
            boundaries.push(text.len());
            text.push(to_char(codepoint));
        }
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    fn slice(&self, range: Range<usize>) -> &str {
        &self.text[self.boundaries[range.start]..self.boundaries[range.end]]
    }
}

/// Split `line` into rows no wider than `max_width`, left to right
///
/// Each row grows one code point at a time until it overflows; the row is
/// then committed without the overflowing code point, which starts the next
/// row. A code point that overflows on its own still forms a row.
fn wrap_rows<M: TextMeasurer + ?Sized>(
    line: &LineRun,
    max_width: f32,
    font: FontId,
    font_size: u32,
    measurer: &M,
) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut end = 0;

    while end < line.len() {
        let candidate = start..end + 1;
        let width = measurer
            .measure_run(font, font_size, line.slice(candidate.clone()))
            .max_x;

        if width > max_width && candidate.len() > 1 {
            rows.push(start..end);
            start = end;
        } else {
            end = candidate.end;
        }
    }

    if start < line.len() {
        rows.push(start..line.len());
    }
    rows
}

/// Compute the placements that make up the visible part of `text`
///
/// Placements are returned in scan order: the most recent row first. Only
/// rows inside the visible window produce placements, but scrolled-past rows
/// are still counted so that numbering stays stable while scrolling.
pub fn compute_visible_layout<M: TextMeasurer + ?Sized>(
    text: &[u32],
    request: &LayoutRequest,
    measurer: &M,
) -> Vec<Placement> {
    let LayoutRequest {
        rect,
        scroll_offset,
        font,
        font_size,
        wrap,
    } = *request;

    if font_size == 0 {
        log::warn!("Console layout requested with a zero font size");
        return Vec::new();
    }

    // Line numbers are i64: an unclamped offset with a 1 px font overflows i32
    let row_height = i64::from(font_size);
    let scroll_offset = i64::from(scroll_offset);
    let line_offset = scroll_offset % row_height;
    let first_visible_line = scroll_offset / row_height + 1;
    let end_line = first_visible_line + i64::from(visible_line_count(rect.h, font_size));

    let row_position = |line: i64| {
        let row_y = rect.h - ((line - first_visible_line + 1) * row_height) as f32
            + line_offset as f32;
        Vec2::new(rect.x, rect.y + row_y)
    };

    let mut placements = Vec::new();
    let mut current_line: i64 = 1;
    let mut line_end = match text.last() {
        Some(&NEWLINE) => text.len() - 1,
        _ => text.len(),
    };

    while current_line < end_line && !text.is_empty() {
        let line_start = text[..line_end]
            .iter()
            .rposition(|&c| c == NEWLINE)
            .map_or(0, |newline| newline + 1);
        let codepoints = &text[line_start..line_end];

        if codepoints.is_empty() {
            current_line += 1;
        } else {
            let line = LineRun::new(codepoints);
            let width = measurer.measure_run(font, font_size, &line.text).max_x;

            if width <= rect.w || wrap == WrapMode::None {
                if current_line >= first_visible_line {
                    placements.push(Placement {
                        text: line.text.clone(),
                        position: row_position(current_line),
                    });
                }
                current_line += 1;
            } else {
                let rows = wrap_rows(&line, rect.w, font, font_size, measurer);
                for row in rows.into_iter().rev() {
                    if current_line >= end_line {
                        break;
                    }
                    if current_line >= first_visible_line {
                        placements.push(Placement {
                            text: line.slice(row).to_string(),
                            position: row_position(current_line),
                        });
                    }
                    current_line += 1;
                }
            }
        }

        if line_start == 0 {
            break;
        }
        line_end = line_start - 1;
    }

    log::debug!(
        "Console layout: {} placements, rows {}..{}",
        placements.len(),
        first_visible_line,
        current_line
    );
    placements
}

/// Lay out the prompt and input line on a single fixed row at `origin`
///
/// The input starts where the measured prompt ends. Neither run wraps or
/// scrolls.
pub fn input_line_layout<M: TextMeasurer + ?Sized>(
    prompt: &[u32],
    input: &[u32],
    origin: Vec2,
    font: FontId,
    font_size: u32,
    measurer: &M,
) -> [Placement; 2] {
    let prompt_text = run_to_string(prompt);
    let input_text = run_to_string(input);

    let prompt_width = if prompt_text.is_empty() {
        0.0
    } else {
        measurer.measure_run(font, font_size, &prompt_text).max_x
    };

    [
        Placement {
            text: prompt_text,
            position: origin,
        },
        Placement {
            text: input_text,
            position: Vec2::new(origin.x + prompt_width, origin.y),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::backend::TextBounds;
    use approx::assert_relative_eq;

    /// Every character is 10 pixels wide
    struct FixedWidth;

    impl TextMeasurer for FixedWidth {
        fn measure_run(&self, _font: FontId, font_size: u32, text: &str) -> TextBounds {
            TextBounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: text.chars().count() as f32 * 10.0,
                max_y: font_size as f32,
            }
        }
    }

    fn codepoints(text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    fn texts(placements: &[Placement]) -> Vec<&str> {
        placements.iter().map(|p| p.text.as_str()).collect()
    }

    fn request(w: f32, h: f32) -> LayoutRequest {
        LayoutRequest::new(Rect::new(0.0, 0.0, w, h), FontId::DEFAULT, 10)
    }

    #[test]
    fn test_visible_line_count_rounds_up() {
        assert_eq!(visible_line_count(30.0, 10), 3);
        assert_eq!(visible_line_count(31.0, 10), 4);
        assert_eq!(visible_line_count(0.0, 10), 0);
        assert_eq!(visible_line_count(30.0, 0), 0);
    }

    #[test]
    fn test_logical_line_count() {
        assert_eq!(logical_line_count(&[]), 0);
        assert_eq!(logical_line_count(&codepoints("a")), 1);
        assert_eq!(logical_line_count(&codepoints("a\nb")), 2);
        assert_eq!(logical_line_count(&codepoints("a\nb\n")), 2);
        assert_eq!(logical_line_count(&codepoints("a\n\nb")), 3);
    }

    #[test]
    fn test_empty_log_has_no_placements() {
        assert!(compute_visible_layout(&[], &request(100.0, 30.0), &FixedWidth).is_empty());
    }

    #[test]
    fn test_trailing_newline_ends_last_line() {
        let text = codepoints("a\nb\n");
        let placements = compute_visible_layout(&text, &request(100.0, 30.0), &FixedWidth);

        assert_eq!(texts(&placements), ["b", "a"]);
        assert_relative_eq!(placements[0].position.y, 20.0);
    }

    #[test]
    fn test_blank_line_occupies_a_row() {
        let text = codepoints("a\n\nb");
        let placements = compute_visible_layout(&text, &request(100.0, 30.0), &FixedWidth);

        assert_eq!(texts(&placements), ["b", "a"]);
        assert_relative_eq!(placements[0].position.y, 20.0);
        assert_relative_eq!(placements[1].position.y, 0.0);
    }

    #[test]
    fn test_rect_origin_offsets_placements() {
        let text = codepoints("x");
        let request = LayoutRequest::new(Rect::new(5.0, 7.0, 100.0, 30.0), FontId::DEFAULT, 10);
        let placements = compute_visible_layout(&text, &request, &FixedWidth);

        assert_relative_eq!(placements[0].position.x, 5.0);
        assert_relative_eq!(placements[0].position.y, 27.0);
    }

    #[test]
    fn test_sub_row_scroll_shifts_every_row() {
        let text = codepoints("a\nb");
        let placements = compute_visible_layout(
            &text,
            &request(100.0, 30.0).with_scroll_offset(4),
            &FixedWidth,
        );

        assert_eq!(texts(&placements), ["b", "a"]);
        assert_relative_eq!(placements[0].position.y, 24.0);
        assert_relative_eq!(placements[1].position.y, 14.0);
    }

    #[test]
    fn test_wrap_disabled_keeps_long_lines_whole() {
        let text = codepoints("HelloWorld");
        let placements = compute_visible_layout(
            &text,
            &request(50.0, 30.0).with_wrap(WrapMode::None),
            &FixedWidth,
        );

        assert_eq!(texts(&placements), ["HelloWorld"]);
    }

    #[test]
    fn test_oversized_character_forms_its_own_row() {
        let text = codepoints("abc");
        let placements = compute_visible_layout(&text, &request(5.0, 50.0), &FixedWidth);

        assert_eq!(texts(&placements), ["c", "b", "a"]);
    }

    #[test]
    fn test_wrap_stops_at_row_budget() {
        let text = codepoints("aaaaabbbbbccccc");
        let placements = compute_visible_layout(&text, &request(50.0, 20.0), &FixedWidth);

        assert_eq!(texts(&placements), ["ccccc", "bbbbb"]);
    }

    #[test]
    fn test_multibyte_rows_split_on_character_boundaries() {
        let text = codepoints("äöüßé");
        let placements = compute_visible_layout(&text, &request(20.0, 50.0), &FixedWidth);

        assert_eq!(texts(&placements), ["é", "üß", "äö"]);
    }

    #[test]
    fn test_zero_font_size_is_empty() {
        let text = codepoints("a");
        let request = LayoutRequest::new(Rect::new(0.0, 0.0, 10.0, 10.0), FontId::DEFAULT, 0);
        assert!(compute_visible_layout(&text, &request, &FixedWidth).is_empty());
    }

    #[test]
    fn test_input_line_follows_prompt() {
        let [prompt, input] = input_line_layout(
            &codepoints("> "),
            &codepoints("help"),
            Vec2::new(4.0, 90.0),
            FontId::DEFAULT,
            10,
            &FixedWidth,
        );

        assert_eq!(prompt.text, "> ");
        assert_eq!(input.text, "help");
        assert_relative_eq!(input.position.x, 24.0);
        assert_relative_eq!(input.position.y, 90.0);
    }
}
