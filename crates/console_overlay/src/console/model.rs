//! Console model
//!
//! Owns the three text buffers (output log, input line, prompt), the scroll
//! state, the active font and the enter callbacks. Everything here is plain
//! state manipulation; drawing lives in [`renderer`](super::renderer).

use super::backend::{ConsoleRenderBackend, FontId, TextMeasurer};
use super::callbacks::{self, CallbackList, CallbackPolicy, EnterHandler};
use super::layout::{self, LayoutRequest, Placement, WrapMode};
use super::{ConsoleError, ConsoleResult};
use crate::config::console::{
    DEFAULT_FONT_SIZE, DEFAULT_INPUT_CAPACITY, DEFAULT_MARGIN, DEFAULT_OUTPUT_CAPACITY,
    DEFAULT_PROMPT_CAPACITY, DEFAULT_SCROLL_STEP,
};
use crate::config::ConsoleConfig;
use crate::foundation::math::Rect;
use crate::text::{CodepointBuffer, UTF8Result};

/// Text console state
#[derive(Debug)]
pub struct Console {
    output: CodepointBuffer,
    input: CodepointBuffer,
    prompt: CodepointBuffer,
    scroll_offset: i32,
    font: FontId,
    font_size: u32,
    margin: f32,
    wrap_mode: WrapMode,
    callback_policy: CallbackPolicy,
    scroll_step: i32,
    callbacks: CallbackList,
}

impl Console {
    /// Create a console with default capacities and an empty prompt
    pub fn new() -> Self {
        log::info!("Creating console");
        Self {
            output: CodepointBuffer::new(DEFAULT_OUTPUT_CAPACITY),
            input: CodepointBuffer::new(DEFAULT_INPUT_CAPACITY),
            prompt: CodepointBuffer::new(DEFAULT_PROMPT_CAPACITY),
            scroll_offset: 0,
            font: FontId::DEFAULT,
            font_size: DEFAULT_FONT_SIZE,
            margin: DEFAULT_MARGIN,
            wrap_mode: WrapMode::default(),
            callback_policy: CallbackPolicy::default(),
            scroll_step: DEFAULT_SCROLL_STEP,
            callbacks: CallbackList::default(),
        }
    }

    /// Create a console from a validated configuration
    ///
    /// The configured font file is not loaded here since that needs a
    /// backend; see [`set_font`](Self::set_font).
    pub fn from_config(config: &ConsoleConfig) -> ConsoleResult<Self> {
        config.validate().map_err(ConsoleError::InvalidConfig)?;

        log::info!(
            "Creating console: font size {}, wrap {:?}, callbacks {:?}",
            config.font_size,
            config.wrap_mode,
            config.callback_policy
        );

        let mut prompt = CodepointBuffer::new(config.prompt_capacity);
        prompt.push_str(&config.prompt);

        Ok(Self {
            output: CodepointBuffer::new(config.output_capacity),
            input: CodepointBuffer::new(config.input_capacity),
            prompt,
            scroll_offset: 0,
            font: FontId::DEFAULT,
            font_size: config.font_size,
            margin: config.margin,
            wrap_mode: config.wrap_mode,
            callback_policy: config.callback_policy,
            scroll_step: config.scroll_step,
            callbacks: CallbackList::default(),
        })
    }

    // Output

    /// Output log
    pub fn output(&self) -> &CodepointBuffer {
        &self.output
    }

    /// Append text to the output log
    pub fn append_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Append one character to the output log
    pub fn append_output_char(&mut self, c: char) {
        self.output.push_char(c);
    }

    /// Append one code point to the output log
    pub fn append_output_codepoint(&mut self, codepoint: u32) {
        self.output.push_codepoint(codepoint);
    }

    /// Append code points to the output log, stopping at an embedded 0
    pub fn append_output_codepoints(&mut self, codepoints: &[u32]) {
        self.output.push_codepoints(codepoints);
    }

    /// Decode UTF-8 bytes onto the output log
    ///
    /// Malformed sequences become U+FFFD. A truncated trailing sequence is
    /// reported after everything before it has been appended.
    pub fn append_output_bytes(&mut self, bytes: &[u8]) -> UTF8Result<usize> {
        self.output.push_bytes(bytes)
    }

    /// Empty the output log
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    // Scrolling

    /// Scroll offset in pixels; positive values show older output
    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    /// Set the scroll offset. No clamping is applied.
    pub fn set_scroll_offset(&mut self, offset: i32) {
        self.scroll_offset = offset;
    }

    /// Move the scroll offset by `delta` pixels
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_offset = self.scroll_offset.saturating_add(delta);
    }

    /// Pixels moved per scroll key press
    pub fn scroll_step(&self) -> i32 {
        self.scroll_step
    }

    /// Set the pixels moved per scroll key press
    pub fn set_scroll_step(&mut self, step: i32) {
        self.scroll_step = step;
    }

    /// Limit the scroll offset to the height of the output log
    ///
    /// The range is `0..=logical_lines * font_size`.
    pub fn clamp_scroll_offset(&mut self) {
        let lines = layout::logical_line_count(self.output.as_slice());
        let max = (lines as i64 * i64::from(self.font_size)).min(i64::from(i32::MAX)) as i32;
        self.scroll_offset = self.scroll_offset.clamp(0, max);
    }

    // Input

    /// Current input line
    pub fn input(&self) -> &CodepointBuffer {
        &self.input
    }

    /// Empty the input line
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Append text to the input line
    pub fn append_input(&mut self, text: &str) {
        self.input.push_str(text);
    }

    /// Append one character to the input line
    pub fn append_input_char(&mut self, c: char) {
        self.input.push_char(c);
    }

    /// Append one code point to the input line
    pub fn append_input_codepoint(&mut self, codepoint: u32) {
        self.input.push_codepoint(codepoint);
    }

    /// Append code points to the input line, stopping at an embedded 0
    pub fn append_input_codepoints(&mut self, codepoints: &[u32]) {
        self.input.push_codepoints(codepoints);
    }

    /// Remove the last code point of the input line, 0 if it is empty
    pub fn pop_input_char(&mut self) -> u32 {
        self.input.pop_codepoint()
    }

    // Prompt

    /// Current prompt
    pub fn prompt(&self) -> &CodepointBuffer {
        &self.prompt
    }

    /// Replace the prompt
    pub fn set_prompt(&mut self, text: &str) {
        self.prompt.clear();
        self.prompt.push_str(text);
    }

    /// Replace the prompt with code points
    pub fn set_prompt_codepoints(&mut self, codepoints: &[u32]) {
        self.prompt.clear();
        self.prompt.push_codepoints(codepoints);
    }

    // Enter callbacks

    /// Register a handler run on every [`trigger_enter`](Self::trigger_enter)
    ///
    /// Handlers run in registration order and cannot be removed.
    pub fn register_enter_callback<H>(&mut self, handler: H)
    where
        H: EnterHandler + 'static,
    {
        self.callbacks.push(Box::new(handler));
        log::debug!("Registered enter callback #{}", self.callbacks.len());
    }

    /// Number of registered enter handlers
    pub fn enter_callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Submit the input line to the enter handlers
    ///
    /// Every handler sees the input as it was when Enter was triggered. The
    /// input is left untouched unless a handler clears it. Handlers registered
    /// during dispatch first run on the next trigger. Returns how many
    /// handlers were invoked.
    pub fn trigger_enter(&mut self) -> usize {
        let policy = self.callback_policy;
        let input = self.input.clone();
        let mut handlers = self.callbacks.take();

        let invoked = callbacks::dispatch(&mut handlers, self, &input, policy);

        self.callbacks.restore(handlers);
        log::trace!("Enter dispatched to {} handlers", invoked);
        invoked
    }

    /// Enter handler propagation policy
    pub fn callback_policy(&self) -> CallbackPolicy {
        self.callback_policy
    }

    /// Set the enter handler propagation policy
    pub fn set_callback_policy(&mut self, policy: CallbackPolicy) {
        self.callback_policy = policy;
    }

    // Font and layout

    /// Active font
    pub fn font(&self) -> FontId {
        self.font
    }

    /// Font size in pixels
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Set the font size in pixels
    pub fn set_font_size(&mut self, font_size: u32) {
        if font_size == 0 {
            log::warn!("Console font size set to zero; nothing will be laid out");
        }
        self.font_size = font_size;
    }

    /// Load a font through the backend and make it active
    ///
    /// The active font is unchanged when loading fails.
    pub fn set_font<B>(&mut self, backend: &mut B, path: &str) -> ConsoleResult<()>
    where
        B: ConsoleRenderBackend + ?Sized,
    {
        let font = backend.load_font(path)?;
        log::info!("Console font set to {} ({:?})", path, font);
        self.font = font;
        Ok(())
    }

    /// Switch to the backend's built-in font at the current size
    pub fn use_default_font<B>(&mut self, backend: &mut B)
    where
        B: ConsoleRenderBackend + ?Sized,
    {
        self.font = backend.default_font(self.font_size);
        log::info!("Console font set to built-in {:?}", self.font);
    }

    /// Gap between the surface edge and the text area
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Set the margin
    pub fn set_margin(&mut self, margin: f32) {
        self.margin = margin;
    }

    /// Output wrapping
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Set output wrapping
    pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
        self.wrap_mode = wrap_mode;
    }

    /// Layout request for the output log inside `rect`
    pub fn layout_request(&self, rect: Rect) -> LayoutRequest {
        LayoutRequest {
            rect,
            scroll_offset: self.scroll_offset,
            font: self.font,
            font_size: self.font_size,
            wrap: self.wrap_mode,
        }
    }

    /// Lay out the visible part of the output log inside `rect`
    pub fn visible_layout<M>(&self, rect: Rect, measurer: &M) -> Vec<Placement>
    where
        M: TextMeasurer + ?Sized,
    {
        layout::compute_visible_layout(self.output.as_slice(), &self.layout_request(rect), measurer)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::callbacks::CallbackFlow;
    use crate::text::UTF8Error;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_output_appends() {
        let mut console = Console::new();
        console.append_output("ab");
        console.append_output_char('c');
        console.append_output_codepoint(u32::from('d'));
        console.append_output_codepoints(&[u32::from('e'), 0, u32::from('f')]);

        assert_eq!(console.output().to_string(), "abcde");
    }

    #[test]
    fn test_output_bytes_report_truncation() {
        let mut console = Console::new();
        let result = console.append_output_bytes(&[b'o', b'k', 0xE2, 0x82]);

        assert!(matches!(result, Err(UTF8Error::TruncatedSequence { .. })));
        assert_eq!(console.output().to_string(), "ok");
    }

    #[test]
    fn test_input_editing() {
        let mut console = Console::new();
        console.append_input("hé");
        console.append_input_char('!');

        assert_eq!(console.pop_input_char(), u32::from('!'));
        assert_eq!(console.pop_input_char(), u32::from('é'));
        assert_eq!(console.input().to_string(), "h");

        console.clear_input();
        assert_eq!(console.pop_input_char(), 0);
    }

    #[test]
    fn test_prompt_is_replaced() {
        let mut console = Console::new();
        console.set_prompt("> ");
        console.set_prompt("$ ");
        assert_eq!(console.prompt().to_string(), "$ ");

        console.set_prompt_codepoints(&[u32::from('#')]);
        assert_eq!(console.prompt().to_string(), "#");
    }

    #[test]
    fn test_scroll_offset_is_not_clamped() {
        let mut console = Console::new();
        console.set_scroll_offset(-30);
        assert_eq!(console.scroll_offset(), -30);

        console.scroll_by(50);
        assert_eq!(console.scroll_offset(), 20);
    }

    #[test]
    fn test_clamp_scroll_offset() {
        let mut console = Console::new();
        console.set_font_size(10);
        console.append_output("a\nb\nc\n");

        console.set_scroll_offset(500);
        console.clamp_scroll_offset();
        assert_eq!(console.scroll_offset(), 30);

        console.set_scroll_offset(-5);
        console.clamp_scroll_offset();
        assert_eq!(console.scroll_offset(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = ConsoleConfig::default()
            .with_prompt("$ ")
            .with_font_size(18)
            .with_callback_policy(CallbackPolicy::InvokeAll);
        let console = Console::from_config(&config).unwrap();

        assert_eq!(console.prompt().to_string(), "$ ");
        assert_eq!(console.font_size(), 18);
        assert_eq!(console.callback_policy(), CallbackPolicy::InvokeAll);
        assert_eq!(console.output().capacity(), config.output_capacity);
    }

    #[test]
    fn test_from_invalid_config() {
        let config = ConsoleConfig::default().with_font_size(0);
        assert!(matches!(
            Console::from_config(&config),
            Err(ConsoleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_enter_does_not_clear_input() {
        let mut console = Console::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        console.register_enter_callback(move |_: &mut Console, input: &CodepointBuffer| {
            log.borrow_mut().push(input.to_string());
            CallbackFlow::Continue
        });

        console.append_input("status");
        assert_eq!(console.trigger_enter(), 1);
        assert_eq!(console.trigger_enter(), 1);

        assert_eq!(*seen.borrow(), ["status", "status"]);
        assert_eq!(console.input().to_string(), "status");
    }

    #[test]
    fn test_handler_sees_snapshot_of_input() {
        let mut console = Console::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        console.register_enter_callback(|console: &mut Console, input: &CodepointBuffer| {
            console.append_output(&input.to_string());
            console.append_output_char('\n');
            console.clear_input();
            CallbackFlow::Continue
        });
        let log = Rc::clone(&seen);
        console.register_enter_callback(move |_: &mut Console, input: &CodepointBuffer| {
            log.borrow_mut().push(input.to_string());
            CallbackFlow::Continue
        });

        console.append_input("echo");
        console.trigger_enter();

        assert_eq!(console.output().to_string(), "echo\n");
        assert!(console.input().is_empty());
        assert_eq!(*seen.borrow(), ["echo"]);
    }

    #[test]
    fn test_handler_registered_during_dispatch_runs_next_time() {
        let mut console = Console::new();
        console.register_enter_callback(|console: &mut Console, _: &CodepointBuffer| {
            console.register_enter_callback(|_: &mut Console, _: &CodepointBuffer| {
                CallbackFlow::Continue
            });
            CallbackFlow::Continue
        });

        assert_eq!(console.trigger_enter(), 1);
        assert_eq!(console.enter_callback_count(), 2);
        assert_eq!(console.trigger_enter(), 2);
        assert_eq!(console.enter_callback_count(), 3);
    }
}
