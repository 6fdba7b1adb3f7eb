//! # Console Overlay
//!
//! An embeddable text console: a scrollback log, a prompt with an editable
//! input line, and callbacks fired when the user presses Enter. The host owns
//! the window and the glyph renderer; the console only asks it to measure and
//! draw runs of text.
//!
//! ## Features
//!
//! - **UTF-8 Codec**: DFA decoder with U+FFFD substitution and resynchronisation
//! - **Code Point Storage**: growable buffers with a null-terminated view
//! - **Line Wrapping**: backward scan of the log, bounded by the visible rows
//! - **Enter Callbacks**: ordered handlers with configurable propagation
//! - **Configuration**: TOML or RON files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use console_overlay::prelude::*;
//!
//! fn redraw<B: ConsoleRenderBackend>(backend: &mut B) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut console = Console::new();
//!     console.set_prompt("> ");
//!     console.register_enter_callback(|console: &mut Console, input: &CodepointBuffer| {
//!         console.append_output(&format!("{}\n", input));
//!         console.clear_input();
//!         CallbackFlow::Continue
//!     });
//!
//!     console.append_input("hello");
//!     console.trigger_enter();
//!
//!     ConsoleRenderer::new().render(&console, backend)
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod console;
pub mod foundation;
pub mod input;
pub mod text;

/// Common imports for console users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConsoleConfig, ConsoleStyleConfig},
        console::{
            CallbackFlow, CallbackPolicy, Console, ConsoleError, ConsoleRenderBackend,
            ConsoleRenderer, EnterHandler, FontError, FontId, LayoutRequest, Placement,
            TextBounds, TextMeasurer, WrapMode,
        },
        foundation::math::{Rect, Vec2, Vec4},
        input::{ConsoleInputEvent, ConsoleKey},
        text::{CodepointBuffer, UTF8Error},
    };
}
