//! # h2pcontrol CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 通过目录服务发现并连接服务器
//! - 演示调用捕获到配置的 sink

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use observability::{LogFormat, LogWriter, ObservabilityConfig};

use cli::{Cli, Commands};
use commands::{run_demo, run_lookup, run_servers, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "h2pcontrol starting");

    let result = match &cli.command {
        Commands::Servers(args) => run_servers(args).await,
        Commands::Lookup(args) => run_lookup(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Demo(args) => run_demo(args).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(logging_config(cli))
}

// Metrics are installed per command from the connector options
fn logging_config(cli: &Cli) -> ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    ObservabilityConfig {
        log_format: match cli.log_format {
            cli::LogFormat::Json => LogFormat::Json,
            cli::LogFormat::Pretty => LogFormat::Pretty,
            cli::LogFormat::Compact => LogFormat::Compact,
        },
        log_writer: LogWriter::Stderr,
        metrics_port: None,
        default_log_level: default_log_level.to_string(),
        ignore_env_filter: cli.quiet,
    }
}
