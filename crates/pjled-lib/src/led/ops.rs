//! LED operations — clear, steady color, blink, and read-back.
//!
//! Each operation validates its input before touching the driver, so a bad
//! color string never results in a partial write.

use serde::Serialize;

use crate::device::StatusLedDriver;
use crate::error::Result;

use super::LedDesignator;
use super::blink::{BlinkPattern, BlinkTiming, clamp_blink_duration};
use super::color::{RgbColor, hex_to_rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedAction {
    Clear,
    Set,
    Blink,
}

/// What a command did, logged as JSON and printed by `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedOutcome {
    pub led: LedDesignator,
    pub action: LedAction,
    pub color: RgbColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<BlinkTiming>,
}

/// LED registers as read back from the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedReadback {
    pub led: LedDesignator,
    pub state: RgbColor,
    pub blink: BlinkPattern,
}

fn log_outcome(outcome: &LedOutcome) {
    match serde_json::to_string(outcome) {
        Ok(json) => log::info!("result: {json}"),
        Err(e) => log::warn!("result not serializable: {e}"),
    }
}

/// Turn an LED off: stop any blink pattern, then set it to black.
pub fn clear_led(device: &mut impl StatusLedDriver, led: LedDesignator) -> Result<LedOutcome> {
    log::info!("turning off {led}");
    device.set_led_blink(led, &BlinkPattern::off())?;
    device.set_led_state(led, RgbColor::BLACK)?;
    let outcome = LedOutcome {
        led,
        action: LedAction::Clear,
        color: RgbColor::BLACK,
        timing: None,
    };
    log_outcome(&outcome);
    Ok(outcome)
}

/// Set a steady color from a hex string.
pub fn set_led(
    device: &mut impl StatusLedDriver,
    led: LedDesignator,
    hex: &str,
) -> Result<LedOutcome> {
    let color = hex_to_rgb(hex)?;
    log::info!("setting {led} to {color}");
    device.set_led_state(led, color)?;
    let outcome = LedOutcome {
        led,
        action: LedAction::Set,
        color,
        timing: None,
    };
    log_outcome(&outcome);
    Ok(outcome)
}

/// Blink a color forever, on for `duration_ms` (clamped) out of every 500 ms.
pub fn blink_led(
    device: &mut impl StatusLedDriver,
    led: LedDesignator,
    hex: &str,
    duration_ms: i64,
) -> Result<LedOutcome> {
    let color = hex_to_rgb(hex)?;
    let timing = clamp_blink_duration(duration_ms);
    log::info!(
        "setting {led} to blink {color}, on={}ms off={}ms",
        timing.on_ms,
        timing.off_ms
    );
    device.set_led_blink(led, &BlinkPattern::repeating(color, timing))?;
    let outcome = LedOutcome {
        led,
        action: LedAction::Blink,
        color,
        timing: Some(timing),
    };
    log_outcome(&outcome);
    Ok(outcome)
}

/// Read the steady color and blink pattern currently stored for `led`.
pub fn read_led(device: &mut impl StatusLedDriver, led: LedDesignator) -> Result<LedReadback> {
    let state = device.get_led_state(led)?;
    let blink = device.get_led_blink(led)?;
    log::debug!("{led}: state={state} blink={blink:?}");
    Ok(LedReadback { led, state, blink })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PjledError;
    use crate::device::DeviceError;
    use crate::device::mock::{LedCall, MockDevice};

    #[test]
    fn clear_stops_blink_then_sets_black() {
        let mut dev = MockDevice::new();
        let outcome = clear_led(&mut dev, LedDesignator::D2).unwrap();
        assert_eq!(
            dev.calls,
            vec![
                LedCall::Blink(LedDesignator::D2, BlinkPattern::off()),
                LedCall::State(LedDesignator::D2, RgbColor::BLACK),
            ]
        );
        assert_eq!(outcome.action, LedAction::Clear);
        assert!(outcome.color.is_off());
    }

    #[test]
    fn set_parses_and_forwards_color() {
        let mut dev = MockDevice::new();
        let outcome = set_led(&mut dev, LedDesignator::D1, "6cf").unwrap();
        assert_eq!(
            dev.calls,
            vec![LedCall::State(
                LedDesignator::D1,
                RgbColor::new(102, 204, 255)
            )]
        );
        assert_eq!(outcome.color, RgbColor::new(102, 204, 255));
        assert!(outcome.timing.is_none());
    }

    #[test]
    fn set_invalid_color_makes_no_calls() {
        let mut dev = MockDevice::new();
        let err = set_led(&mut dev, LedDesignator::D1, "#12345").unwrap_err();
        assert!(matches!(err, PjledError::InvalidColorFormat(_)));
        assert!(dev.calls.is_empty());
    }

    #[test]
    fn blink_clamps_duration() {
        let mut dev = MockDevice::new();
        let outcome = blink_led(&mut dev, LedDesignator::D2, "aa00aa", 5).unwrap();
        let expected = BlinkPattern {
            count: 255,
            on_color: RgbColor::new(170, 0, 170),
            on_ms: 10,
            off_color: RgbColor::BLACK,
            off_ms: 490,
        };
        assert_eq!(dev.calls, vec![LedCall::Blink(LedDesignator::D2, expected)]);
        assert_eq!(
            outcome.timing,
            Some(BlinkTiming {
                on_ms: 10,
                off_ms: 490
            })
        );
    }

    #[test]
    fn blink_invalid_color_makes_no_calls() {
        let mut dev = MockDevice::new();
        assert!(blink_led(&mut dev, LedDesignator::D2, "nothex", 250).is_err());
        assert!(dev.calls.is_empty());
    }

    #[test]
    fn driver_failure_propagates() {
        let mut dev = MockDevice {
            fail: true,
            ..MockDevice::default()
        };
        let err = set_led(&mut dev, LedDesignator::D1, "fff").unwrap_err();
        assert!(matches!(
            err,
            PjledError::Device(DeviceError::Communication(_))
        ));
    }

    #[test]
    fn read_returns_stored_registers() {
        let mut dev = MockDevice::new();
        blink_led(&mut dev, LedDesignator::D1, "3300aa", 300).unwrap();
        set_led(&mut dev, LedDesignator::D1, "3300aa").unwrap();
        let rb = read_led(&mut dev, LedDesignator::D1).unwrap();
        assert_eq!(rb.state, RgbColor::new(51, 0, 170));
        assert_eq!((rb.blink.on_ms, rb.blink.off_ms), (300, 200));
    }

    #[test]
    fn outcome_json_shape() {
        let mut dev = MockDevice::new();
        let outcome = blink_led(&mut dev, LedDesignator::D1, "#66ccff", 1000).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["led"], "D1");
        assert_eq!(json["action"], "blink");
        assert_eq!(json["color"], serde_json::json!([102, 204, 255]));
        assert_eq!(json["timing"]["on_ms"], 490);
        assert_eq!(json["timing"]["off_ms"], 10);
    }

    #[test]
    fn outcome_json_omits_timing_for_set() {
        let mut dev = MockDevice::new();
        let outcome = set_led(&mut dev, LedDesignator::D2, "000").unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("timing").is_none());
    }
}
