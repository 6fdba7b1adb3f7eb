//! Console overlay demo
//!
//! Drives a console from stdin and draws each frame as a character grid on
//! stdout. Every typed line is submitted with Enter and echoed into the
//! output log. `/up` and `/down` scroll, `/quit` exits.
//!
//! Usage: `console_demo [config.toml|config.ron]`

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;

use console_overlay::foundation::logging;
use console_overlay::prelude::*;

const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consectetur adipisicing elit, sed do \
    eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis \
    nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

/// Demo errors
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

/// Backend that rasterizes runs into a grid of character cells
///
/// Every glyph is one cell wide; a row is one font size tall.
struct TextGridBackend {
    width: u32,
    height: u32,
    cell_width: f32,
    row_height: f32,
    cells: Vec<Vec<char>>,
    next_font: u32,
}

impl TextGridBackend {
    fn new(width: u32, height: u32, cell_width: f32, row_height: f32) -> Self {
        Self {
            width,
            height,
            cell_width,
            row_height,
            cells: Vec::new(),
            next_font: 1,
        }
    }

    fn columns(&self) -> usize {
        (self.width as f32 / self.cell_width) as usize
    }

    fn rows(&self) -> usize {
        (self.height as f32 / self.row_height) as usize
    }

    fn cell(&mut self, x: f32, y: f32) -> Option<&mut char> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let column = (x / self.cell_width) as usize;
        let row = (y / self.row_height).round() as usize;
        self.cells.get_mut(row)?.get_mut(column)
    }
}

impl TextMeasurer for TextGridBackend {
    fn measure_run(&self, _font: FontId, font_size: u32, text: &str) -> TextBounds {
        TextBounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: text.chars().count() as f32 * self.cell_width,
            max_y: font_size as f32,
        }
    }
}

impl ConsoleRenderBackend for TextGridBackend {
    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_console_pass(&mut self, _clear_color: Vec4) -> Result<(), Box<dyn Error>> {
        self.cells = vec![vec![' '; self.columns()]; self.rows()];
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, _color: Vec4) -> Result<(), Box<dyn Error>> {
        let mut x = rect.x;
        while x < rect.x + rect.w {
            if let Some(cell) = self.cell(x, rect.y) {
                *cell = '.';
            }
            x += self.cell_width;
        }
        Ok(())
    }

    fn draw_run(
        &mut self,
        _font: FontId,
        _font_size: u32,
        position: Vec2,
        text: &str,
        _color: Vec4,
    ) -> Result<f32, Box<dyn Error>> {
        let mut x = position.x;
        for c in text.chars() {
            if let Some(cell) = self.cell(x, position.y) {
                *cell = c;
            }
            x += self.cell_width;
        }
        Ok(x)
    }

    fn end_console_pass(&mut self) -> Result<(), Box<dyn Error>> {
        let border = "-".repeat(self.columns() + 2);
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", border)?;
        for row in &self.cells {
            writeln!(stdout, "|{}|", row.iter().collect::<String>())?;
        }
        writeln!(stdout, "{}", border)?;
        stdout.flush()?;
        Ok(())
    }

    fn load_font(&mut self, path: &str) -> Result<FontId, FontError> {
        if !Path::new(path).exists() {
            return Err(FontError::NotFound(path.to_string()));
        }
        let font = FontId(self.next_font);
        self.next_font += 1;
        Ok(font)
    }

    fn default_font(&mut self, _font_size: u32) -> FontId {
        FontId::DEFAULT
    }
}

fn load_config() -> Result<ConsoleConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading console configuration from {}", path);
            Ok(ConsoleConfig::load_from_file(&path)?)
        }
        None => Ok(ConsoleConfig::new(480, 160)
            .with_font_size(16)
            .with_prompt("console> ")),
    }
}

fn echo_input(console: &mut Console, input: &CodepointBuffer) -> CallbackFlow {
    console.append_output_codepoints(input.as_slice());
    console.append_output_char('\n');
    console.clear_input();
    CallbackFlow::Continue
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    let mut console = Console::from_config(&config)?;
    let mut backend = TextGridBackend::new(config.width, config.height, 8.0, config.font_size as f32);
    let mut renderer = ConsoleRenderer::from_style(&config.style);

    match &config.font_path {
        Some(path) => console.set_font(&mut backend, path)?,
        None => console.use_default_font(&mut backend),
    }

    console.register_enter_callback(echo_input);

    console.append_input("Hello Input!");
    console.append_output("1 Hello Output!\n");
    console.append_output("2 Hello Output!\n3 Hello Output!\n");
    console.append_output(LOREM_IPSUM);
    console.append_output_char('\n');

    let render = |renderer: &mut ConsoleRenderer, console: &Console, backend: &mut TextGridBackend| {
        renderer
            .render_if_dirty(console, backend)
            .map_err(|e| DemoError::Render(e.to_string()))
    };

    render(&mut renderer, &console, &mut backend)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let events: Vec<ConsoleInputEvent> = match line.trim() {
            "/quit" => break,
            "/up" => vec![ConsoleInputEvent::Key(ConsoleKey::ScrollUp)],
            "/down" => vec![ConsoleInputEvent::Key(ConsoleKey::ScrollDown)],
            _ => line
                .chars()
                .map(ConsoleInputEvent::Char)
                .chain(std::iter::once(ConsoleInputEvent::Key(ConsoleKey::Enter)))
                .collect(),
        };

        for event in events {
            if console.handle_input(event) {
                renderer.mark_dirty();
            }
        }
        console.clamp_scroll_offset();

        render(&mut renderer, &console, &mut backend)?;
    }

    log::info!("Console demo finished");
    Ok(())
}

fn main() {
    logging::init_with_level(log::LevelFilter::Info);

    log::info!("Starting console overlay demo");

    if let Err(e) = run() {
        log::error!("Console demo failed: {}", e);
        std::process::exit(1);
    }
}
