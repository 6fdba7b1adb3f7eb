//! Console scenario tests
//!
//! Exercise the model, layout and renderer together against a recording
//! backend with fixed-width glyphs.
