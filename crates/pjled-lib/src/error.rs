//! Unified error type for the pjled-lib crate.
//!
//! [`PjledError`] wraps driver errors ([`DeviceError`]) and the input
//! validation failures raised before any hardware is touched.
//! `From` impls allow `?` to propagate across module boundaries.

use std::fmt;

use crate::device::DeviceError;

/// Unified error type for pjled-lib operations.
#[derive(Debug)]
pub enum PjledError {
    /// Driver error (bus open, transfer, checksum).
    Device(DeviceError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Hex color string that is not 3 or 6 hex digits.
    InvalidColorFormat(String),
    /// LED designator other than `D1` / `D2`.
    InvalidLed(String),
    /// Configuration validation error.
    Config(String),
}

impl fmt::Display for PjledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PjledError::Device(e) => write!(f, "{e}"),
            PjledError::Io(e) => write!(f, "I/O error: {e}"),
            PjledError::InvalidColorFormat(s) => write!(
                f,
                "Invalid color format: {s} (use 3 or 6 hex digits, e.g. 6cf or #66ccff)"
            ),
            PjledError::InvalidLed(s) => write!(f, "Invalid LED: {s} (use D1 or D2)"),
            PjledError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for PjledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PjledError::Device(e) => Some(e),
            PjledError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for PjledError {
    fn from(e: DeviceError) -> Self {
        PjledError::Device(e)
    }
}

impl From<std::io::Error> for PjledError {
    fn from(e: std::io::Error) -> Self {
        PjledError::Io(e)
    }
}

/// Crate-level Result alias using [`PjledError`].
pub type Result<T> = std::result::Result<T, PjledError>;
