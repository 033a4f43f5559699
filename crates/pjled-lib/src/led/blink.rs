//! Blink timing — on/off period pairs for the PiJuice `SetLedBlink` call.

use serde::Serialize;

use super::color::RgbColor;

/// Total length of one blink cycle (on + off) in milliseconds.
pub const BLINK_PERIOD_MS: u16 = 500;

/// Shortest allowed on or off phase in milliseconds.
pub const MIN_PHASE_MS: u16 = 10;

/// Longest allowed on phase (`BLINK_PERIOD_MS - MIN_PHASE_MS`).
pub const MAX_PHASE_MS: u16 = BLINK_PERIOD_MS - MIN_PHASE_MS;

/// `count` value that makes the board repeat the pattern indefinitely.
pub const REPEAT_FOREVER: u8 = 255;

/// One blink cycle. Both phases lie in `[10, 490]` and always sum to 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlinkTiming {
    pub on_ms: u16,
    pub off_ms: u16,
}

/// Clamp a requested on-time into a [`BlinkTiming`].
///
/// The on phase is clamped to `[10, 490]` and the off phase fills the rest of
/// the 500 ms cycle. Every input yields a valid timing.
pub fn clamp_blink_duration(requested_on_ms: i64) -> BlinkTiming {
    let on_ms = requested_on_ms.clamp(MIN_PHASE_MS.into(), MAX_PHASE_MS.into()) as u16;
    BlinkTiming {
        on_ms,
        off_ms: BLINK_PERIOD_MS - on_ms,
    }
}

/// Full argument set of a `SetLedBlink` request.
///
/// Periods are carried in milliseconds; the board stores them in 10 ms units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlinkPattern {
    /// Number of cycles; 0 stops blinking, 255 repeats forever.
    pub count: u8,
    pub on_color: RgbColor,
    pub on_ms: u16,
    pub off_color: RgbColor,
    pub off_ms: u16,
}

impl BlinkPattern {
    /// Pattern that stops any blinking in progress.
    pub const fn off() -> Self {
        BlinkPattern {
            count: 0,
            on_color: RgbColor::BLACK,
            on_ms: 0,
            off_color: RgbColor::BLACK,
            off_ms: 0,
        }
    }

    /// Endless blink of `color`, dark during the off phase.
    pub const fn repeating(color: RgbColor, timing: BlinkTiming) -> Self {
        BlinkPattern {
            count: REPEAT_FOREVER,
            on_color: color,
            on_ms: timing.on_ms,
            off_color: RgbColor::BLACK,
            off_ms: timing.off_ms,
        }
    }

    pub fn is_active(&self) -> bool {
        self.count != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_below_minimum() {
        let t = clamp_blink_duration(5);
        assert_eq!(t.on_ms, 10);
        assert_eq!(t.off_ms, 490);
    }

    #[test]
    fn clamp_above_maximum() {
        let t = clamp_blink_duration(1000);
        assert_eq!(t.on_ms, 490);
        assert_eq!(t.off_ms, 10);
    }

    #[test]
    fn clamp_midpoint_unchanged() {
        let t = clamp_blink_duration(250);
        assert_eq!(
            t,
            BlinkTiming {
                on_ms: 250,
                off_ms: 250
            }
        );
    }

    #[test]
    fn clamp_boundaries_are_inclusive() {
        assert_eq!(clamp_blink_duration(10).on_ms, 10);
        assert_eq!(clamp_blink_duration(490).on_ms, 490);
        assert_eq!(clamp_blink_duration(9).on_ms, 10);
        assert_eq!(clamp_blink_duration(491).on_ms, 490);
    }

    #[test]
    fn clamp_negative_and_extreme_inputs() {
        assert_eq!(clamp_blink_duration(0).on_ms, 10);
        assert_eq!(clamp_blink_duration(-250).on_ms, 10);
        assert_eq!(clamp_blink_duration(i64::MIN).on_ms, 10);
        assert_eq!(clamp_blink_duration(i64::MAX).on_ms, 490);
    }

    #[test]
    fn phases_always_sum_to_period() {
        let samples = [
            i64::MIN,
            -1_000_000,
            -1,
            0,
            1,
            137,
            500,
            65_536,
            i64::MAX,
        ];
        for d in samples.into_iter().chain(-100..600) {
            let t = clamp_blink_duration(d);
            assert_eq!(t.on_ms + t.off_ms, BLINK_PERIOD_MS, "sum broken for {d}");
            assert!((MIN_PHASE_MS..=MAX_PHASE_MS).contains(&t.on_ms));
            assert!((MIN_PHASE_MS..=MAX_PHASE_MS).contains(&t.off_ms));
        }
    }

    #[test]
    fn clamp_is_idempotent() {
        for d in [-5, 5, 10, 123, 250, 490, 1000] {
            let t = clamp_blink_duration(d);
            assert_eq!(clamp_blink_duration(t.on_ms.into()), t);
        }
    }

    #[test]
    fn off_pattern_is_inactive_and_dark() {
        let p = BlinkPattern::off();
        assert!(!p.is_active());
        assert!(p.on_color.is_off());
        assert!(p.off_color.is_off());
        assert_eq!((p.on_ms, p.off_ms), (0, 0));
    }

    #[test]
    fn repeating_pattern_uses_timing() {
        let color = RgbColor::new(170, 0, 170);
        let p = BlinkPattern::repeating(color, clamp_blink_duration(100));
        assert_eq!(p.count, REPEAT_FOREVER);
        assert_eq!(p.on_color, color);
        assert_eq!(p.off_color, RgbColor::BLACK);
        assert_eq!((p.on_ms, p.off_ms), (100, 400));
        assert!(p.is_active());
    }

    #[test]
    fn timing_serializes_with_field_names() {
        let json = serde_json::to_value(clamp_blink_duration(250)).unwrap();
        assert_eq!(json["on_ms"], 250);
        assert_eq!(json["off_ms"], 250);
    }
}
