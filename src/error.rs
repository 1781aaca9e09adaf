//! Unified error types for the supervisor firmware.
//!
//! The runtime philosophy is fail-safe-by-default: in-handler faults
//! (out-of-range storage address, out-of-range duty fraction, spurious
//! post-lockdown firings) are silent no-ops, because interrupt context has
//! no receiver for a propagated error. What remains fallible is the init
//! path, configuration validation, which funnels into this type and
//! surfaces through `anyhow` in `main`.

use core::fmt;

/// Every fallible init-path operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
