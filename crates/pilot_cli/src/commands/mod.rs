//! CLI command definitions.
//!
//! Each subcommand drives one of the DataPilot engines from the terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

pub mod chat;
pub mod config;
pub mod monitor;
pub mod route;

/// DataPilot - simulated multi-agent data science assistant
#[derive(Parser)]
#[command(name = "pilot")]
#[command(version, about = "DataPilot - simulated multi-agent data science assistant")]
#[command(long_about = r#"
DataPilot routes natural-language requests to one of four simulated agents
(Data Engineer, Data Analyst, Data Scientist, Insight Agent) and answers
with canned replies after a short delay.

COMMANDS:
  route    → Show which agent a request would be routed to
  chat     → Interactive chat session (/upload <path>, /quit)
  monitor  → Print simulated dashboard snapshots
  config   → Print the effective configuration

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true, env = "PILOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route a request and print the decision
    Route(route::RouteArgs),

    /// Start an interactive chat session
    Chat(chat::ChatArgs),

    /// Run the dashboard simulators
    Monitor(monitor::MonitorArgs),

    /// Print the effective configuration
    Config(config::ConfigArgs),
}

/// Arguments that parse but cannot be used
#[derive(Error, Debug)]
#[error("Invalid argument: {0}")]
pub struct InvalidArgs(pub String);
