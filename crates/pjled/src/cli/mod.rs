//! CLI subcommands — LED control, read-back, configuration.

mod config_cmd;
mod led_cmd;
mod status;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use serde::Serialize;

pub(super) use pjled_lib::config::Config;
pub(super) use pjled_lib::device::{self, StatusLedDriver};
pub(super) use pjled_lib::error::Result;
pub(super) use pjled_lib::led::{self, LedDesignator, LedOutcome, LedReadback};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w);
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub device: String,
    pub leds: Vec<LedReadback>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

// ── Invocation context ──

/// Everything a subcommand needs besides its own flags: the loaded config
/// and the bus location after CLI overrides.
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub bus: u8,
    pub address: u8,
    pub json: bool,
}

impl Context {
    pub fn new(
        config_path: Option<PathBuf>,
        bus: Option<u8>,
        address: Option<u8>,
        json: bool,
    ) -> Self {
        let config = load_config(config_path.as_deref());
        Context {
            bus: bus.unwrap_or(config.i2c_bus),
            address: address.unwrap_or(config.i2c_address),
            config_path: config_path.or_else(Config::path),
            config,
            json,
        }
    }

    fn open(&self) -> Result<device::PlatformDevice> {
        Ok(device::open_device(self.bus, self.address)?)
    }
}

/// Load config from a custom path or the default location, logging parse warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// `--led` values, listed in `--help` and matched case-insensitively.
fn led_parser() -> impl TypedValueParser<Value = LedDesignator> {
    PossibleValuesParser::new(LedDesignator::ALL.map(|l| l.name()))
        .try_map(|s| s.parse::<LedDesignator>())
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Turn an LED off (stops blinking)
    Clear {
        /// LED to address: D1 or D2 (default from config, D2)
        #[arg(short, long, ignore_case = true, value_parser = led_parser())]
        led: Option<LedDesignator>,
    },

    /// Set an LED to a steady color
    Set {
        /// LED to address: D1 or D2 (default from config, D2)
        #[arg(short, long, ignore_case = true, value_parser = led_parser())]
        led: Option<LedDesignator>,
        /// Hex color to set (6cf, 66ccff, #66ccff)
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Blink an LED in a 500 ms cycle
    Blink {
        /// LED to address: D1 or D2 (default from config, D2)
        #[arg(short, long, ignore_case = true, value_parser = led_parser())]
        led: Option<LedDesignator>,
        /// Hex color to blink (6cf, 66ccff, #66ccff)
        #[arg(short, long)]
        color: Option<String>,
        /// On-duration in milliseconds, clamped to 10..=490
        #[arg(short, long, allow_negative_numbers = true)]
        duration: Option<i64>,
    },

    /// Read LED color and blink pattern back from the board
    Status {
        /// Only show this LED (default: both)
        #[arg(short, long, ignore_case = true, value_parser = led_parser())]
        led: Option<LedDesignator>,
    },

    /// Show current configuration and file path
    Config,
}

pub fn run(cmd: Command, ctx: &Context) -> Result<()> {
    match cmd {
        Command::Clear { led } => {
            let led = led.unwrap_or_else(|| ctx.config.led());
            led_cmd::cmd_clear(&mut ctx.open()?, led, ctx.json)
        }
        Command::Set { led, color } => {
            let led = led.unwrap_or_else(|| ctx.config.led());
            let color = color.unwrap_or_else(|| ctx.config.set_color.clone());
            // Reject bad input before the bus is opened
            led::hex_to_rgb(&color)?;
            led_cmd::cmd_set(&mut ctx.open()?, led, &color, ctx.json)
        }
        Command::Blink {
            led,
            color,
            duration,
        } => {
            let led = led.unwrap_or_else(|| ctx.config.led());
            let color = color.unwrap_or_else(|| ctx.config.blink_color.clone());
            let duration = duration.unwrap_or(ctx.config.blink_duration);
            led::hex_to_rgb(&color)?;
            led_cmd::cmd_blink(&mut ctx.open()?, led, &color, duration, ctx.json)
        }
        Command::Status { led } => {
            let leds = match led {
                Some(led) => vec![led],
                None => LedDesignator::ALL.to_vec(),
            };
            status::cmd_status(&mut ctx.open()?, &leds, ctx.json)
        }
        Command::Config => config_cmd::cmd_config(ctx),
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn kv_width_top_only() {
        let w = kv_width(&["Short:", "Longer key:"], &[]);
        // "Longer key:" = 11 + PADDING = 13
        assert_eq!(w, 13);
    }

    #[test]
    fn kv_width_indent_drives_width() {
        let w = kv_width(&["LED:"], &["blink_duration:"]);
        // "blink_duration:" = 15 + PADDING + 2 = 19
        assert_eq!(w, 19);
    }

    #[test]
    fn kv_width_empty_both() {
        assert_eq!(kv_width(&[], &[]), 0);
    }
}

#[cfg(test)]
mod context_tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn context_uses_config_bus_and_address() {
        let (_dir, path) = write_config("i2c_bus = 3\ni2c_address = 0x15\n");
        let ctx = Context::new(Some(path.clone()), None, None, false);
        assert_eq!(ctx.bus, 3);
        assert_eq!(ctx.address, 0x15);
        assert_eq!(ctx.config_path, Some(path));
    }

    #[test]
    fn cli_overrides_config() {
        let (_dir, path) = write_config("i2c_bus = 3\ni2c_address = 0x15\n");
        let ctx = Context::new(Some(path), Some(0), Some(0x20), true);
        assert_eq!(ctx.bus, 0);
        assert_eq!(ctx.address, 0x20);
        assert!(ctx.json);
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let (_dir, path) = write_config("not { toml");
        let config = load_config(Some(&path));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_color_fails_before_opening_bus() {
        let (_dir, path) = write_config("");
        // Bus 250 does not exist; a color error must win over an open error.
        let ctx = Context::new(Some(path), Some(250), None, false);
        let err = run(
            Command::Set {
                led: None,
                color: Some("#12".into()),
            },
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(err, pjled_lib::PjledError::InvalidColorFormat(_)));
    }

    #[test]
    fn missing_bus_is_device_error() {
        let (_dir, path) = write_config("");
        let ctx = Context::new(Some(path), Some(250), None, false);
        let err = run(Command::Clear { led: None }, &ctx).unwrap_err();
        assert!(matches!(err, pjled_lib::PjledError::Device(_)));
    }

    #[test]
    fn config_command_succeeds_without_device() {
        let (_dir, path) = write_config("default_led = \"D1\"\n");
        let ctx = Context::new(Some(path), None, None, true);
        assert!(run(Command::Config, &ctx).is_ok());
    }
}
