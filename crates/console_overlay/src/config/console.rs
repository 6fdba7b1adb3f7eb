//! # Console Configuration
//!
//! Settings a host reads at startup to construct a [`Console`](crate::console::Console)
//! and its renderer: surface size, font, buffer capacities, wrapping,
//! callback propagation and colors.
//!
//! Every field has a default, so a configuration file only needs to name the
//! values it changes:
//!
//! ```toml
//! font_size = 18
//! prompt = "$ "
//! wrap_mode = "None"
//!
//! [style]
//! text_color = [1.0, 1.0, 1.0, 1.0]
//! ```

use serde::{Deserialize, Serialize};

use super::Config;
use crate::console::callbacks::CallbackPolicy;
use crate::console::layout::WrapMode;
use crate::foundation::math::color_from_rgba8;

/// Default output buffer capacity in code points
pub const DEFAULT_OUTPUT_CAPACITY: usize = 1024;
/// Default input line capacity in code points
pub const DEFAULT_INPUT_CAPACITY: usize = 128;
/// Default prompt capacity in code points
pub const DEFAULT_PROMPT_CAPACITY: usize = 16;
/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: u32 = 14;
/// Default margin around the console surface in pixels
pub const DEFAULT_MARGIN: f32 = 4.0;
/// Default scroll distance per scroll key press in pixels
pub const DEFAULT_SCROLL_STEP: i32 = 12;

/// Console colors as RGBA in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleStyleConfig {
    /// Color of output, prompt and input text
    pub text_color: [f32; 4],
    /// Clear color of the console surface
    pub background_color: [f32; 4],
    /// Fill behind the prompt and input row
    pub prompt_background_color: [f32; 4],
}

impl Default for ConsoleStyleConfig {
    fn default() -> Self {
        Self {
            text_color: color_from_rgba8(192, 192, 192, 255).into(),
            background_color: color_from_rgba8(64, 64, 64, 255).into(),
            prompt_background_color: color_from_rgba8(0, 0, 0, 255).into(),
        }
    }
}

/// # Console Configuration
///
/// Top-level settings for one console instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Font file to load; the host's built-in font when absent
    pub font_path: Option<String>,
    /// Font size in pixels, also the height of one text row
    pub font_size: u32,
    /// Gap between the surface edge and the text area
    pub margin: f32,
    /// Initial prompt text
    pub prompt: String,
    /// Initial capacity of the output buffer
    pub output_capacity: usize,
    /// Initial capacity of the input line
    pub input_capacity: usize,
    /// Initial capacity of the prompt
    pub prompt_capacity: usize,
    /// Line wrapping of the output area
    pub wrap_mode: WrapMode,
    /// How enter callbacks propagate
    pub callback_policy: CallbackPolicy,
    /// Pixels scrolled per scroll key press
    pub scroll_step: i32,
    /// Colors
    pub style: ConsoleStyleConfig,
}

impl ConsoleConfig {
    /// Create a configuration for a surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the font file
    pub fn with_font_path(mut self, path: impl Into<String>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Set the font size
    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the margin
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the prompt text
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the initial buffer capacities (output, input, prompt)
    pub fn with_capacities(mut self, output: usize, input: usize, prompt: usize) -> Self {
        self.output_capacity = output;
        self.input_capacity = input;
        self.prompt_capacity = prompt;
        self
    }

    /// Set the wrap mode
    pub fn with_wrap_mode(mut self, wrap_mode: WrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self
    }

    /// Set the enter callback propagation policy
    pub fn with_callback_policy(mut self, policy: CallbackPolicy) -> Self {
        self.callback_policy = policy;
        self
    }

    /// Set the scroll step
    pub fn with_scroll_step(mut self, step: i32) -> Self {
        self.scroll_step = step;
        self
    }

    /// Set the colors
    pub fn with_style(mut self, style: ConsoleStyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.font_size == 0 {
            return Err("Font size must be at least 1".to_string());
        }

        if self.output_capacity == 0 || self.input_capacity == 0 || self.prompt_capacity == 0 {
            return Err("Buffer capacities must be at least 1".to_string());
        }

        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(format!("Margin must be a non-negative number, got {}", self.margin));
        }

        let drawable_width = self.width as f32 - self.margin * 2.0;
        let drawable_height = self.height as f32 - self.margin * 2.0;
        if drawable_width <= 0.0 || drawable_height < self.font_size as f32 {
            return Err(format!(
                "Margin {} leaves no drawable area on a {}x{} surface",
                self.margin, self.width, self.height
            ));
        }

        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            margin: DEFAULT_MARGIN,
            prompt: "> ".to_string(),
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
            input_capacity: DEFAULT_INPUT_CAPACITY,
            prompt_capacity: DEFAULT_PROMPT_CAPACITY,
            wrap_mode: WrapMode::default(),
            callback_policy: CallbackPolicy::default(),
            scroll_step: DEFAULT_SCROLL_STEP,
            style: ConsoleStyleConfig::default(),
        }
    }
}

impl Config for ConsoleConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConsoleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.font_size, 14);
        assert_eq!(config.output_capacity, 1024);
        assert_eq!(config.wrap_mode, WrapMode::Char);
        assert_eq!(config.callback_policy, CallbackPolicy::StopOnSignal);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            font_size = 18
            prompt = "$ "
            wrap_mode = "None"
            callback_policy = "InvokeAll"

            [style]
            text_color = [1.0, 1.0, 1.0, 1.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.font_size, 18);
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.wrap_mode, WrapMode::None);
        assert_eq!(config.callback_policy, CallbackPolicy::InvokeAll);
        assert_eq!(config.style.text_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            config.style.background_color,
            ConsoleStyleConfig::default().background_color
        );
        assert_eq!(config.width, 640);
    }

    #[test]
    fn test_ron_parsing() {
        let config =
            ConsoleConfig::from_ron_str("(width: 320, height: 200, margin: 2.0)").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 200);
        assert_eq!(config.margin, 2.0);
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = ConsoleConfig::from_toml_str("font_size = \"big\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir();
        let toml_path = dir.join(format!("console_overlay_cfg_{}.toml", std::process::id()));
        let ron_path = dir.join(format!("console_overlay_cfg_{}.ron", std::process::id()));

        let config = ConsoleConfig::new(800, 600)
            .with_font_path("fonts/mono.ttf")
            .with_prompt(">>> ")
            .with_callback_policy(CallbackPolicy::InvokeAll);

        for path in [&toml_path, &ron_path] {
            let path = path.to_str().unwrap();
            config.save_to_file(path).unwrap();
            let loaded = ConsoleConfig::load_from_file(path).unwrap();
            assert_eq!(loaded, config);
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ConsoleConfig::default().save_to_file("console.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let result = ConsoleConfig::load_from_file("does-not-exist.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_validation_rejects_degenerate_settings() {
        assert!(ConsoleConfig::default().with_font_size(0).validate().is_err());
        assert!(ConsoleConfig::default().with_capacities(0, 1, 1).validate().is_err());
        assert!(ConsoleConfig::default().with_margin(-1.0).validate().is_err());
        assert!(ConsoleConfig::new(100, 100).with_margin(50.0).validate().is_err());
        assert!(ConsoleConfig::new(100, 20).with_margin(4.0).validate().is_err());
        assert!(ConsoleConfig::new(100, 22).with_margin(4.0).validate().is_ok());
    }
}
