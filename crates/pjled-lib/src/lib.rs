//! pjled — status LED control for the PiJuice UPS hat.

pub mod config;
pub mod device;
pub mod error;
pub mod led;
pub mod protocol;

pub use error::PjledError;
