//! Logging utilities
//!
//! The library only emits through the `log` facade; binaries embedding the
//! console pick a logger. `init_with_level` installs `env_logger`.

pub use log::{debug, info, warn, error, trace};

/// Initialize logging with a default level, still overridable through `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
