//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable output
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for combis
#[derive(Parser, Debug)]
#[command(name = "combis")]
#[command(author, version, about = "Association governance engine - votes and notifications")]
#[command(long_about = r#"
Combis runs the governance core of a mutual-aid association: members vote on
claims and decisions, results are applied to the voted object, and members
are notified in real time and by SMS.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./combis.toml       Project-level config
3. ~/.config/combis/config.toml   Global config
4. COMBIS_* environment variables (e.g. COMBIS_SMS__ENABLED=true)

Example:
  combis serve --seed members.toml
  combis simulate scenario.toml --output json
  combis show-config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the real-time notification server
    Serve {
        /// Seed file with members, claims and SMS templates
        #[arg(long, value_name = "PATH")]
        seed: PathBuf,

        /// Override the configured listening port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Replay a scenario against the engine with a simulated clock
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show configuration file locations and the effective configuration
    ShowConfig,
}
