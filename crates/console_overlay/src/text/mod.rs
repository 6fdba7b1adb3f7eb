//! Text storage and encoding
//!
//! - [`utf8`]: UTF-8 encoder and DFA decoder
//! - [`codepoint_buffer`]: growable null-terminated code-point storage

pub mod utf8;
pub mod codepoint_buffer;

pub use codepoint_buffer::{run_to_string, to_char, CodepointBuffer};
pub use utf8::{UTF8Decoder, UTF8Error, UTF8Result, DecodeStatus, REPLACEMENT_CHARACTER};
