//! Foundation module - Core utilities and types
//!
//! - Math types (positions, colors, rectangles)
//! - Logging utilities

pub mod math;
pub mod logging;
