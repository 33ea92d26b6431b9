//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// h2pcontrol - service registry client and call capture
#[derive(Parser, Debug)]
#[command(
    name = "h2pcontrol",
    author,
    version,
    about = "h2pcontrol service registry client",
    long_about = "Discovers servers through an h2pcontrol directory, connects to them by \n\
                  name, and records instrumented calls to console, CSV tables, or InfluxDB."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "H2P_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "H2P_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to the directory and list its servers
    Servers(ServersArgs),

    /// Look up a server by name and connect to it
    Lookup(LookupArgs),

    /// Validate configuration file without connecting
    Validate(ValidateArgs),

    /// Run sample instrumented calls through the configured sink
    Demo(DemoArgs),
}

/// Configuration source and overrides shared by the connecting commands
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to configuration file (TOML or JSON); defaults are used if omitted
    #[arg(short, long, env = "H2P_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override directory address (`host:port`)
    #[arg(long, env = "H2P_DIRECTORY")]
    pub directory: Option<String>,

    /// Override sink selection (console, file-table, time-series)
    #[arg(long, env = "H2P_SINK")]
    pub sink: Option<String>,

    /// Override InfluxDB API token
    #[arg(long, env = "H2P_INFLUX_TOKEN", hide_env_values = true)]
    pub influx_token: Option<String>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "H2P_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `servers` command
#[derive(Parser, Debug)]
pub struct ServersArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `lookup` command
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Server name as reported by the directory
    pub name: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "h2pcontrol.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `demo` command
#[derive(Parser, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// First operand
    #[arg(long, default_value = "6")]
    pub a: i64,

    /// Second operand
    #[arg(long, default_value = "7")]
    pub b: i64,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
