//! # Block Bridge CLI
//!
//! Command-line interface for running and inspecting a Block Bridge host.
//!
//! ## Available Commands
//!
//! - `init` - Write a default configuration file
//! - `run` - Drive simulated blocks through the bridge to a controller
//! - `encode` - Print the wire JSON for one lifecycle action
//! - `replay` - Resend a recorded transcript and report divergences
//! - `version` - Display version information
//!
//! ## Example Usage
//!
//! ```bash
//! # Create blockbridge.toml in the current directory
//! blockbridge init --dir .
//!
//! # Run 100 blocks against the configured controller
//! blockbridge run --config blockbridge.toml --blocks 100
//!
//! # Show what END_BLOCK at height 500 looks like on the wire
//! blockbridge encode --phase end --height 500 --time 1700000000
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod commands;
pub mod utils;

// Re-export the main CLI types for convenience
pub use commands::{run_cli, Cli, Commands};
pub use utils::{CliError, CliResult, LogFormat, OutputFormat};

/// Version information for the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI application name
pub const APP_NAME: &str = "blockbridge";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "blockbridge.toml";

/// Default data directory name
pub const DEFAULT_DATA_DIR: &str = ".blockbridge";

/// Get the default data directory path
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_DATA_DIR))
}

/// Get the default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    default_data_dir().join(DEFAULT_CONFIG_FILE)
}
