//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::led::{self, LedDesignator};
use crate::protocol::{DEFAULT_I2C_ADDRESS, DEFAULT_I2C_BUS};

/// Valid 7-bit I2C device addresses (reserved ranges excluded).
const I2C_ADDRESS_RANGE: std::ops::RangeInclusive<u8> = 0x03..=0x77;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// I2C bus number (`/dev/i2c-N`). Default: 1.
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: u8,

    /// 7-bit address of the PiJuice. Default: 0x14.
    #[serde(default = "default_i2c_address")]
    pub i2c_address: u8,

    /// LED used when `--led` is not given. Default: "D2".
    #[serde(default = "default_led")]
    pub default_led: String,

    /// Color for `set` when `--color` is not given.
    #[serde(default = "default_set_color")]
    pub set_color: String,

    /// Color for `blink` when `--color` is not given.
    #[serde(default = "default_blink_color")]
    pub blink_color: String,

    /// On-time in milliseconds for `blink` when `--duration` is not given.
    #[serde(default = "default_blink_duration")]
    pub blink_duration: i64,
}

fn default_i2c_bus() -> u8 {
    DEFAULT_I2C_BUS
}
fn default_i2c_address() -> u8 {
    DEFAULT_I2C_ADDRESS
}
fn default_led() -> String {
    "D2".into()
}
fn default_set_color() -> String {
    "3300aa".into()
}
fn default_blink_color() -> String {
    "aa00aa".into()
}
fn default_blink_duration() -> i64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Config {
            i2c_bus: default_i2c_bus(),
            i2c_address: default_i2c_address(),
            default_led: default_led(),
            set_color: default_set_color(),
            blink_color: default_blink_color(),
            blink_duration: default_blink_duration(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A color field could not be parsed (`field` is `"set_color"` or `"blink_color"`).
    InvalidColor { field: &'static str, value: String },
    InvalidLed(String),
    /// Address outside the 7-bit device range.
    InvalidAddress(u8),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidColor { field, value } => {
                write!(f, "Invalid {field}: {value:?} is not a 3 or 6 digit hex color")
            }
            ValidationError::InvalidLed(v) => {
                write!(f, "Invalid default_led: {v:?} (use D1 or D2)")
            }
            ValidationError::InvalidAddress(a) => write!(
                f,
                "Invalid i2c_address: 0x{a:02x} (must be 0x{:02x}..=0x{:02x})",
                I2C_ADDRESS_RANGE.start(),
                I2C_ADDRESS_RANGE.end()
            ),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pjled"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Parse `default_led`, falling back to `D2` with a warning if invalid.
    pub fn led(&self) -> LedDesignator {
        self.default_led.parse().unwrap_or_else(|e| {
            log::warn!("{e}, using {}", LedDesignator::default());
            LedDesignator::default()
        })
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("set_color", &self.set_color),
            ("blink_color", &self.blink_color),
        ] {
            if led::hex_to_rgb(value).is_err() {
                errors.push(ValidationError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }

        if self.default_led.parse::<LedDesignator>().is_err() {
            errors.push(ValidationError::InvalidLed(self.default_led.clone()));
        }

        if !I2C_ADDRESS_RANGE.contains(&self.i2c_address) {
            errors.push(ValidationError::InvalidAddress(self.i2c_address));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Parse an I2C address given as hex (`0x14`) or decimal (`20`).
pub fn parse_address(s: &str) -> crate::error::Result<u8> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    match parsed {
        Ok(a) if I2C_ADDRESS_RANGE.contains(&a) => Ok(a),
        Ok(a) => Err(crate::PjledError::Config(
            ValidationError::InvalidAddress(a).to_string(),
        )),
        Err(e) => Err(crate::PjledError::Config(format!(
            "Invalid I2C address {s:?}: {e}"
        ))),
    }
}
