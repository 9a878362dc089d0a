//! DataPilot CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;

use commands::{Cli, Commands, InvalidArgs};
use config::{ConfigError, PilotConfig};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "pilot=debug"
    } else if cli.quiet {
        "pilot=warn"
    } else {
        "pilot=info"
    };
    let mut filter = EnvFilter::from_default_env();
    for directive in [default_level, "warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    // Logging may already be initialized
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match PilotConfig::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Route(args) => commands::route::execute(args, &config).await,
            Commands::Chat(args) => commands::chat::execute(args, &config, cli.quiet).await,
            Commands::Monitor(args) => commands::monitor::execute(args, &config).await,
            Commands::Config(args) => commands::config::execute(args, &config).await,
        },
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Map an error to its exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<InvalidArgs>().is_some() {
        ExitCodes::INVALID_ARGS
    } else if e.downcast_ref::<ConfigError>().is_some()
        || e.downcast_ref::<pilot_router::RouterError>().is_some()
        || e.downcast_ref::<pilot_monitor::MonitorError>().is_some()
    {
        ExitCodes::CONFIG_ERROR
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_error() {
        let err = anyhow::Error::from(InvalidArgs("ticks".to_string()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);

        let err = anyhow::Error::from(pilot_monitor::MonitorError::ZeroInterval(
            "demo_interval_ms".to_string(),
        ));
        assert_eq!(categorize_error(&err), ExitCodes::CONFIG_ERROR);

        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["pilot", "route", "train", "a", "model"]).unwrap();
        assert!(matches!(cli.command, Commands::Route(_)));

        let cli = Cli::try_parse_from(["pilot", "--verbose", "monitor", "--ticks", "3"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Monitor(_)));

        let cli = Cli::try_parse_from([
            "pilot", "monitor", "--agent", "model-training", "--set", "epochs=200",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Monitor(_)));
        assert!(Cli::try_parse_from(["pilot", "monitor", "--set", "epochs=200"]).is_err());
        assert!(Cli::try_parse_from(["pilot", "monitor", "--agent", "x", "--set", "epochs"]).is_err());

        assert!(Cli::try_parse_from(["pilot", "route"]).is_err());
    }
}
