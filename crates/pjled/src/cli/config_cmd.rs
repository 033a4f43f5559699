//! `config` subcommand — show current configuration and file path.

use super::{ConfigOutput, Context, Result, kv, kv_indent, kv_width, led, print_json};

pub(super) fn cmd_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let config_exists = ctx.config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };

    if ctx.json {
        return print_json(&ConfigOutput {
            config_file: ctx.config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config.clone(),
            problems,
        });
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:", "Bus:"],
        &[
            "i2c_bus:",
            "i2c_address:",
            "default_led:",
            "set_color:",
            "blink_color:",
            "blink_duration:",
        ],
    );

    match &ctx.config_path {
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    kv(
        "Bus:",
        format_args!("/dev/i2c-{} @ 0x{:02x}", ctx.bus, ctx.address),
        w,
    );
    println!();

    let color_display = |hex: &str| match led::hex_to_rgb(hex) {
        Ok(c) => format!("{hex} -> {c}"),
        Err(_) => format!("{hex} (invalid)"),
    };
    let timing = led::clamp_blink_duration(config.blink_duration);

    println!("Settings:");
    kv_indent("i2c_bus:", config.i2c_bus, w);
    kv_indent("i2c_address:", format_args!("0x{:02x}", config.i2c_address), w);
    kv_indent("default_led:", &config.default_led, w);
    kv_indent("set_color:", color_display(&config.set_color), w);
    kv_indent("blink_color:", color_display(&config.blink_color), w);
    kv_indent(
        "blink_duration:",
        format_args!(
            "{} -> on {}ms, off {}ms",
            config.blink_duration, timing.on_ms, timing.off_ms
        ),
        w,
    );

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}
