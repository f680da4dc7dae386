//! Logging facade and initialization.
//!
//! Library code logs through the `log` macros; hosts either call [`init`]
//! for an environment-configured logger or install their own.

pub use log::{debug, error, info, trace, warn};

/// Installs the default `env_logger` backend (`RUST_LOG`-controlled).
pub fn init() {
    env_logger::init();
}
