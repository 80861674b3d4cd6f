//! Shared utilities for CLI commands.
//!
//! This module provides common functionality used across CLI commands:
//! - Error types and result handling
//! - Output formatting
//! - Console message helpers

use blockbridge_bridge::{BridgeError, FatalHandler, FatalInconsistency, PortRegistry};
use blockbridge_config::{Config, ConfigError};
use blockbridge_controller::{
    DryRunChannel, ProcessChannel, TranscriptChannel, TranscriptError,
};
use blockbridge_core::{ChannelError, ControllerChannel, PortError};
use blockbridge_types::ActionError;
use clap::ValueEnum;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

// ============================================================================
// Error Types
// ============================================================================

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Lifecycle bridge error
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Controller channel error
    #[error("Controller error: {0}")]
    Channel(#[from] ChannelError),

    /// Port registry error
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// Action encoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] ActionError),

    /// Transcript error
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Replay produced different outcomes than the recording
    #[error("Replay diverged from transcript in {0} call(s)")]
    Divergence(usize),
}

/// CLI result type alias
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Output Formatting
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Log line format options
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Condensed single-line text
    Compact,
}

impl LogFormat {
    /// Parse the `[logging] format` config value. Unknown values fall back to text.
    pub fn from_config(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Text,
        }
    }
}

/// Print an info message to stderr (so JSON output stays clean)
pub fn print_info(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[INFO]").cyan().bold(), msg);
}

/// Print a success message to stderr
pub fn print_success(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[OK]").green().bold(), msg);
}

/// Print a warning message to stderr
pub fn print_warning(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[WARN]").yellow().bold(), msg);
}

/// Print an error message to stderr
pub fn print_error(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[ERROR]").red().bold(), msg);
}

// ============================================================================
// Bridge Wiring
// ============================================================================

/// Controller connection built from configuration.
pub struct ControllerLink {
    /// Channel the bridge sends actions through
    pub channel: Arc<dyn ControllerChannel>,
    /// Spawned controller process, if any
    pub process: Option<Arc<ProcessChannel>>,
}

impl ControllerLink {
    /// Connect to the controller described by `config`.
    ///
    /// `dry_run` overrides `controller.dry_run`. When `record` is set and
    /// transcripts are enabled, the channel is wrapped in a recorder.
    pub fn connect(config: &Config, dry_run: bool, record: bool) -> CliResult<Self> {
        let mut process = None;
        let base: Arc<dyn ControllerChannel> = if dry_run || config.controller.dry_run {
            Arc::new(DryRunChannel::new())
        } else {
            let spawned = Arc::new(ProcessChannel::spawn(
                &config.controller.command,
                &config.controller.args,
                config.controller.max_frame_bytes,
            )?);
            process = Some(Arc::clone(&spawned));
            spawned
        };

        let channel: Arc<dyn ControllerChannel> = if record && config.transcript.enabled {
            print_info(&format!(
                "Recording controller calls to {}",
                config.transcript.path.display()
            ));
            Arc::new(TranscriptChannel::create(base, &config.transcript.path)?)
        } else {
            base
        };

        Ok(Self { channel, process })
    }

    /// Fatal handler that stops the spawned controller, then runs `then`.
    pub fn fatal_handler(&self, then: Arc<dyn FatalHandler>) -> Arc<dyn FatalHandler> {
        Arc::new(KillControllerFirst {
            process: self.process.clone(),
            then,
        })
    }

    /// Stop the controller process, if one was spawned.
    pub async fn shutdown(&self) -> CliResult<()> {
        if let Some(process) = &self.process {
            if let Some(code) = process.try_exit_code().await? {
                print_warning(&format!(
                    "Controller {} exited early with code {}",
                    process.program(),
                    code
                ));
            }
            process.shutdown().await?;
        }
        Ok(())
    }
}

/// Signals the controller before handing over to the next handler.
///
/// An aborting handler skips destructors, so the child would otherwise
/// outlive the node.
struct KillControllerFirst {
    process: Option<Arc<ProcessChannel>>,
    then: Arc<dyn FatalHandler>,
}

impl FatalHandler for KillControllerFirst {
    fn on_fatal(&self, fatal: &FatalInconsistency) {
        if let Some(process) = &self.process {
            if !process.start_kill() {
                warn!(program = process.program(), "Could not signal controller before fatal exit");
            }
        }
        self.then.on_fatal(fatal);
    }
}

/// Build the port registry from the configured bindings.
pub fn port_registry(config: &Config) -> CliResult<PortRegistry> {
    let bindings = config.ports.iter().map(|b| (b.name.as_str(), b.port));
    Ok(PortRegistry::with_bindings(bindings)?)
}

/// Load a configuration file, reporting a missing file distinctly.
pub fn load_config(path: &Path) -> CliResult<Config> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(Config::load(path)?)
}
