//! `status` subcommand — read LED registers back from the board.

use pjled_lib::led::{BlinkPattern, RgbColor};

use super::{
    LedDesignator, LedReadback, Result, StatusLedDriver, StatusOutput, kv, kv_indent, kv_width,
    led, print_json,
};

fn describe_color(c: RgbColor) -> String {
    if c.is_off() {
        format!("{c} (off)")
    } else {
        c.to_string()
    }
}

fn describe_blink(p: &BlinkPattern) -> String {
    if !p.is_active() {
        return "off".into();
    }
    let repeat = if p.count == led::REPEAT_FOREVER {
        "forever".to_string()
    } else {
        format!("{} times", p.count)
    };
    format!(
        "{} {}ms / {} {}ms, {repeat}",
        p.on_color, p.on_ms, p.off_color, p.off_ms
    )
}

pub(super) fn cmd_status(
    device: &mut impl StatusLedDriver,
    leds: &[LedDesignator],
    json: bool,
) -> Result<()> {
    let readbacks = leds
        .iter()
        .map(|&l| led::read_led(device, l))
        .collect::<Result<Vec<LedReadback>>>()?;

    if json {
        return print_json(&StatusOutput {
            device: device.path().to_string(),
            leds: readbacks,
        });
    }

    let w = kv_width(&["Device:"], &["Color:", "Blink:"]);
    kv("Device:", device.path(), w);
    for rb in &readbacks {
        println!();
        println!("{}:", rb.led);
        kv_indent("Color:", describe_color(rb.state), w);
        kv_indent("Blink:", describe_blink(&rb.blink), w);
    }
    Ok(())
}
