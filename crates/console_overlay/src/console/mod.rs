//! Console
//!
//! - [`model`]: console state and operations
//! - [`layout`]: output log layout with line wrapping
//! - [`callbacks`]: enter handlers and propagation policy
//! - [`backend`]: traits the host graphics layer implements
//! - [`renderer`]: one redraw against a backend

pub mod backend;
pub mod callbacks;
pub mod layout;
pub mod model;
pub mod renderer;

#[cfg(test)]
mod tests;

pub use backend::{ConsoleRenderBackend, FontError, FontId, TextBounds, TextMeasurer};
pub use callbacks::{CallbackFlow, CallbackPolicy, EnterHandler};
pub use layout::{compute_visible_layout, LayoutRequest, Placement, WrapMode};
pub use model::Console;
pub use renderer::ConsoleRenderer;

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Console errors
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Configuration failed validation
    #[error("Invalid console configuration: {0}")]
    InvalidConfig(String),

    /// Font could not be provisioned
    #[error("Font error: {0}")]
    Font(#[from] FontError),
}
