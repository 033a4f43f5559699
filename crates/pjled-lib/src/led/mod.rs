//! LED control — designators, color parsing, blink timing, driver operations.

mod blink;
mod color;
mod ops;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use blink::{
    BLINK_PERIOD_MS, BlinkPattern, BlinkTiming, MAX_PHASE_MS, MIN_PHASE_MS, REPEAT_FOREVER,
    clamp_blink_duration,
};
pub use color::{RgbColor, hex_to_rgb};
pub use ops::{LedAction, LedOutcome, LedReadback, blink_led, clear_led, read_led, set_led};

use crate::error::PjledError;

/// One of the two status LEDs on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LedDesignator {
    D1,
    #[default]
    D2,
}

impl LedDesignator {
    pub const ALL: [LedDesignator; 2] = [LedDesignator::D1, LedDesignator::D2];

    /// Register offset added to the base LED command.
    pub fn index(self) -> u8 {
        match self {
            LedDesignator::D1 => 0,
            LedDesignator::D2 => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LedDesignator::D1 => "D1",
            LedDesignator::D2 => "D2",
        }
    }
}

impl fmt::Display for LedDesignator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LedDesignator {
    type Err = PjledError;

    /// Case-insensitive: `d1`, `D1`, `d2`, `D2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LedDesignator::ALL
            .into_iter()
            .find(|led| led.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PjledError::InvalidLed(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("D1".parse::<LedDesignator>().unwrap(), LedDesignator::D1);
        assert_eq!("d1".parse::<LedDesignator>().unwrap(), LedDesignator::D1);
        assert_eq!(" d2 ".parse::<LedDesignator>().unwrap(), LedDesignator::D2);
    }

    #[test]
    fn parse_rejects_unknown() {
        for bad in ["", "D3", "D", "1", "led1"] {
            assert!(matches!(
                bad.parse::<LedDesignator>(),
                Err(PjledError::InvalidLed(_))
            ));
        }
    }

    #[test]
    fn default_is_d2() {
        assert_eq!(LedDesignator::default(), LedDesignator::D2);
    }

    #[test]
    fn index_matches_register_offset() {
        assert_eq!(LedDesignator::D1.index(), 0);
        assert_eq!(LedDesignator::D2.index(), 1);
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for led in LedDesignator::ALL {
            assert_eq!(led.to_string().parse::<LedDesignator>().unwrap(), led);
        }
    }

    #[test]
    fn serializes_as_name() {
        assert_eq!(serde_json::to_string(&LedDesignator::D1).unwrap(), "\"D1\"");
    }
}
