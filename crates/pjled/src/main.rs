//! pjled — control the status LEDs on a PiJuice UPS hat.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

mod cli;

#[derive(Debug, Parser)]
#[command(
    name = "pjled",
    version,
    about = "Control the status LEDs on a PiJuice UPS hat"
)]
struct Args {
    /// Be more verbose (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: <config dir>/pjled/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// I2C bus number, overrides the config file
    #[arg(long, global = true, value_name = "N")]
    bus: Option<u8>,

    /// I2C address in hex (0x14) or decimal, overrides the config file
    #[arg(long, global = true, value_name = "ADDR", value_parser = pjled_lib::config::parse_address)]
    address: Option<u8>,

    #[command(subcommand)]
    command: cli::Command,
}

/// Map the `-v` count to a log level: warn, info, then debug at most.
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Build and install the process logger. `RUST_LOG` still takes precedence.
fn init_logger(verbose: u8) {
    let level = log_level(verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp_secs()
        .format_target(false)
        .init();
    log::debug!("verbose = {verbose}, log level: {level}");
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let ctx = cli::Context::new(args.config, args.bus, args.address, args.json);
    if let Err(e) = cli::run(args.command, &ctx) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_clamps_at_debug() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(9), LevelFilter::Debug);
    }

    #[test]
    fn verbose_is_repeatable() {
        let args = Args::try_parse_from(["pjled", "-vv", "clear"]).unwrap();
        assert_eq!(args.verbose, 2);
        let args = Args::try_parse_from(["pjled", "clear", "--verbose"]).unwrap();
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn led_is_case_insensitive() {
        let args = Args::try_parse_from(["pjled", "clear", "--led", "d1"]).unwrap();
        match args.command {
            cli::Command::Clear { led } => {
                assert_eq!(led, Some(pjled_lib::led::LedDesignator::D1))
            }
            _ => panic!("expected clear"),
        }
    }

    #[test]
    fn led_rejects_unknown_name() {
        let err = Args::try_parse_from(["pjled", "set", "-l", "D3"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn address_accepts_hex() {
        let args = Args::try_parse_from(["pjled", "--address", "0x15", "clear"]).unwrap();
        assert_eq!(args.address, Some(0x15));
    }

    #[test]
    fn address_rejects_out_of_range() {
        assert!(Args::try_parse_from(["pjled", "--address", "0x80", "clear"]).is_err());
    }
}
