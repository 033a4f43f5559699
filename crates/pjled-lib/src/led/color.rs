//! Hex color parsing for PiJuice LED control.
//!
//! The board takes one byte per channel, so colors are plain `[r, g, b]`
//! triples on the wire.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{PjledError, Result};

/// An RGB LED color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }

    pub const fn from_array([r, g, b]: [u8; 3]) -> Self {
        RgbColor { r, g, b }
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn is_off(self) -> bool {
        self == RgbColor::BLACK
    }
}

/// Formats as lowercase `#rrggbb`.
impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Serializes as `[r, g, b]`, the shape the vendor driver logs.
impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

/// Parse a hex color string into an [`RgbColor`].
///
/// Accepts 6 digits (`"66ccff"`) or 3-digit shorthand (`"6cf"`, each digit
/// doubled), optionally prefixed with `#`, case-insensitive. Surrounding
/// whitespace is trimmed and only a single leading `#` is stripped, so
/// `"##6cf"` is rejected. Anything else is [`PjledError::InvalidColorFormat`].
pub fn hex_to_rgb(s: &str) -> Result<RgbColor> {
    let trimmed = s.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let invalid = || PjledError::InvalidColorFormat(s.to_string());

    let nibbles: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;

    let color = match nibbles.as_slice() {
        &[r1, r0, g1, g0, b1, b0] => RgbColor::new((r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0),
        &[r, g, b] => RgbColor::new((r << 4) | r, (g << 4) | g, (b << 4) | b),
        _ => return Err(invalid()),
    };
    log::debug!("hex_to_rgb: in={hex} out={:?}", color.to_array());
    Ok(color)
}
