//! `clear` / `set` / `blink` subcommands — write LED registers.

use super::{LedDesignator, LedOutcome, Result, StatusLedDriver, led, print_json};

fn report(outcome: &LedOutcome, json: bool) -> Result<()> {
    if json {
        return print_json(outcome);
    }
    match outcome.timing {
        Some(t) => println!(
            "{}: blinking {} (on {}ms, off {}ms)",
            outcome.led, outcome.color, t.on_ms, t.off_ms
        ),
        None if outcome.color.is_off() => println!("{}: off", outcome.led),
        None => println!("{}: {}", outcome.led, outcome.color),
    }
    Ok(())
}

pub(super) fn cmd_clear(
    device: &mut impl StatusLedDriver,
    led: LedDesignator,
    json: bool,
) -> Result<()> {
    let outcome = led::clear_led(device, led)?;
    report(&outcome, json)
}

pub(super) fn cmd_set(
    device: &mut impl StatusLedDriver,
    led: LedDesignator,
    color: &str,
    json: bool,
) -> Result<()> {
    let outcome = led::set_led(device, led, color)?;
    report(&outcome, json)
}

pub(super) fn cmd_blink(
    device: &mut impl StatusLedDriver,
    led: LedDesignator,
    color: &str,
    duration: i64,
    json: bool,
) -> Result<()> {
    let outcome = led::blink_led(device, led, color, duration)?;
    report(&outcome, json)
}
