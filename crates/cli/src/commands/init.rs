//! Configuration initialization command.
//!
//! This module handles the `blockbridge init` command, which writes a default
//! `blockbridge.toml` into a directory.

use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use blockbridge_config::Config;

use crate::utils::{print_info, print_success, CliError, CliResult, OutputFormat};
use crate::DEFAULT_CONFIG_FILE;

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Directory to write the configuration into
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Result of a successful init
#[derive(Debug, Serialize)]
struct InitResult {
    dir: String,
    config_file: String,
    storage_port: Option<u32>,
}

/// Execute the init command
pub async fn execute(args: InitArgs, output_format: OutputFormat) -> CliResult<()> {
    let dir = args.dir.unwrap_or_else(crate::default_data_dir);

    print_info(&format!("Initializing Block Bridge at: {}", dir.display()));

    let config_path = dir.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(CliError::InvalidArgument(format!(
            "Configuration already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    fs::create_dir_all(&dir)?;

    let config = Config::default();
    config.save(&config_path)?;
    tracing::debug!(path = %config_path.display(), "Wrote default configuration");

    let result = InitResult {
        dir: dir.to_string_lossy().to_string(),
        config_file: config_path.to_string_lossy().to_string(),
        storage_port: config.port_for("storage"),
    };

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            print_success("Block Bridge initialized successfully!");
            println!();
            println!("Configuration:");
            println!("  Directory:   {}", result.dir);
            println!("  Config File: {}", result.config_file);
            println!();
            println!("Next steps:");
            println!("  1. Set [controller] command in {}", result.config_file);
            println!(
                "  2. Run blocks:  blockbridge run --config {}",
                result.config_file
            );
        }
    }

    Ok(())
}
