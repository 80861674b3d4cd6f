//! CLI command definitions and handlers.
//!
//! This module defines all available CLI commands using clap's derive macros.
//! Each subcommand has its own module with implementation details.

pub mod encode;
pub mod init;
pub mod replay;
pub mod run;

use crate::utils::{CliResult, LogFormat, OutputFormat};
use blockbridge_config::Config;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Block Bridge - block lifecycle relay between a consensus host and a controller
#[derive(Parser, Debug)]
#[command(name = "blockbridge")]
#[command(author = "Block Bridge Team")]
#[command(version)]
#[command(about = "Block lifecycle bridge and controller tools", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global output format for command results
    #[arg(global = true, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(global = true, short, long)]
    pub quiet: bool,

    /// Log line format (defaults to the config file's `[logging] format`)
    #[arg(global = true, long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init(init::InitArgs),

    /// Drive simulated blocks through the bridge
    Run(run::RunArgs),

    /// Print the wire JSON of one lifecycle action
    Encode(encode::EncodeArgs),

    /// Resend a recorded transcript to the controller
    Replay(replay::ReplayArgs),

    /// Show version information
    Version,
}

impl Commands {
    /// Configuration file used by the command, if it takes one.
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Run(args) => Some(&args.config),
            Commands::Replay(args) => Some(&args.config),
            _ => None,
        }
    }
}

/// Execute the CLI with parsed arguments
pub async fn run_cli(cli: Cli) -> CliResult<()> {
    // Commands with a config file take their logging defaults from it
    let logging = cli
        .command
        .config_path()
        .filter(|path| path.exists())
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|content| Config::from_str(&content).ok())
        .map(|config| config.logging)
        .unwrap_or_default();

    let filter = log_filter(cli.quiet, cli.verbose, &logging.level);
    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&logging.format));
    init_tracing(&filter, format);

    match cli.command {
        Commands::Init(args) => init::execute(args, cli.output).await,
        Commands::Run(args) => run::execute(args, cli.output).await,
        Commands::Encode(args) => encode::execute(args, cli.output),
        Commands::Replay(args) => replay::execute(args, cli.output).await,
        Commands::Version => execute_version(cli.output),
    }
}

/// Filter directive for the given verbosity flags and configured level.
pub fn log_filter(quiet: bool, verbose: u8, configured: &str) -> String {
    match (quiet, verbose) {
        (true, _) => "error".to_string(),
        (_, 0) => configured.to_lowercase(),
        (_, 1) => "info,blockbridge=debug".to_string(),
        (_, 2) => "debug".to_string(),
        (_, _) => "trace".to_string(),
    }
}

/// Initialize tracing with the given filter and format. `RUST_LOG` wins when set.
fn init_tracing(filter: &str, format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `--output json` stays parseable
    let result = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(env_filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .with(env_filter)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .with(env_filter)
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// Execute the version command
fn execute_version(output_format: OutputFormat) -> CliResult<()> {
    let version_info = VersionInfo::new();

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&version_info)?);
        }
        OutputFormat::Text => {
            println!("Block Bridge CLI");
            println!("  Version:     {}", version_info.version);
            println!("  Git Commit:  {}", version_info.git_commit);
            println!("  Rust:        {}", version_info.rust_version);
            println!("  Target:      {}", version_info.target);
        }
    }

    Ok(())
}

/// Version information structure
#[derive(Debug, serde::Serialize)]
struct VersionInfo {
    version: String,
    git_commit: String,
    rust_version: String,
    target: String,
}

impl VersionInfo {
    fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
            rust_version: option_env!("RUSTC_VERSION")
                .unwrap_or(env!("CARGO_PKG_RUST_VERSION"))
                .to_string(),
            target: std::env::consts::ARCH.to_string() + "-" + std::env::consts::OS,
        }
    }
}
