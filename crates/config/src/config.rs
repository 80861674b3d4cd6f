//! Main configuration module for Block Bridge
//!
//! All settings for a bridge host live in one `blockbridge.toml` file. Every
//! section has defaults, so a file only needs the values it changes.

use crate::error::{ConfigError, ConfigResult};
use blockbridge_types::{BlockContext, StoragePort};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use blockbridge_types::DEFAULT_MAX_FRAME_BYTES;

/// Main configuration struct containing all Block Bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How to reach the controller
    pub controller: ControllerConfig,

    /// Simulated host block production
    pub host: HostConfig,

    /// Call transcript recording
    pub transcript: TranscriptConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Port bindings registered at startup
    pub ports: Vec<PortBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            host: HostConfig::default(),
            transcript: TranscriptConfig::default(),
            logging: LoggingConfig::default(),
            ports: default_ports(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use blockbridge_config::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::load(Path::new("blockbridge.toml"))?;
    /// ```
    pub fn load(path: &Path) -> ConfigResult<Self> {
        info!("Loading configuration from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)?;

        debug!("Configuration parsed successfully, validating...");
        config.validate()?;

        info!(
            "Configuration loaded: controller={}, ports={}",
            config.controller.describe(),
            config.ports.len()
        );

        Ok(config)
    }

    /// Load configuration from a TOML string.
    ///
    /// Useful for testing or when configuration is provided as a string.
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.controller.validate()?;
        validate_ports(&self.ports)?;
        self.host.validate()?;
        self.transcript.validate()?;
        self.logging.validate()?;

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Port bound to `name`, if configured.
    pub fn port_for(&self, name: &str) -> Option<StoragePort> {
        self.ports.iter().find(|b| b.name == name).map(|b| b.port)
    }
}

// =============================================================================
// Controller Configuration
// =============================================================================

/// Controller process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Program to spawn
    pub command: String,

    /// Arguments passed to the program
    pub args: Vec<String>,

    /// Largest reply frame accepted from the controller
    pub max_frame_bytes: usize,

    /// Log actions instead of sending them to a controller
    pub dry_run: bool,
}

impl ControllerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.dry_run && self.command.trim().is_empty() {
            return Err(ConfigError::MissingField("controller.command"));
        }

        if self.max_frame_bytes == 0 {
            return Err(ConfigError::InvalidFrameLimit(self.max_frame_bytes));
        }

        Ok(())
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        if self.dry_run {
            "dry-run".to_string()
        } else if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            command: "./controller".to_string(),
            args: Vec::new(),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            dry_run: false,
        }
    }
}

// =============================================================================
// Port Bindings
// =============================================================================

/// A named port registered with the bridge at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortBinding {
    /// Port name, e.g. `storage`
    pub name: String,

    /// Port number
    pub port: StoragePort,
}

impl PortBinding {
    pub fn new(name: impl Into<String>, port: StoragePort) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

/// Default bindings: `storage` on port 1.
pub fn default_ports() -> Vec<PortBinding> {
    vec![PortBinding::new("storage", 1)]
}

fn validate_ports(ports: &[PortBinding]) -> ConfigResult<()> {
    let mut names = HashSet::new();
    let mut numbers = HashSet::new();

    for binding in ports {
        if binding.name.trim().is_empty() {
            return Err(ConfigError::EmptyPortName);
        }
        if binding.port == 0 {
            return Err(ConfigError::ReservedPort(binding.name.clone()));
        }
        if !names.insert(binding.name.as_str()) {
            return Err(ConfigError::DuplicatePortName(binding.name.clone()));
        }
        if !numbers.insert(binding.port) {
            return Err(ConfigError::DuplicatePortNumber(binding.port));
        }
    }

    Ok(())
}

// =============================================================================
// Host Configuration
// =============================================================================

/// Parameters of the simulated host used by `blockbridge run`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// Height of the first block
    pub start_height: i64,

    /// Unix time of the first block, in seconds
    pub genesis_time: i64,

    /// Seconds of block time between consecutive blocks
    pub block_interval_secs: i64,

    /// Wall-clock pause between blocks in milliseconds
    pub pause_ms: u64,
}

impl HostConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.start_height < 1 {
            return Err(ConfigError::InvalidStartHeight(self.start_height));
        }

        if self.genesis_time < 0 {
            return Err(ConfigError::InvalidGenesisTime(self.genesis_time));
        }

        if self.block_interval_secs < 1 {
            return Err(ConfigError::InvalidBlockInterval(self.block_interval_secs));
        }

        Ok(())
    }

    /// Context of the `index`-th simulated block, counting from zero.
    pub fn block_at(&self, index: u64) -> Option<BlockContext> {
        let offset = i64::try_from(index).ok()?;
        let height = self.start_height.checked_add(offset)?;
        let time = self
            .genesis_time
            .checked_add(offset.checked_mul(self.block_interval_secs)?)?;
        BlockContext::from_unix(height, time)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            start_height: 1,
            genesis_time: 1_700_000_000,
            block_interval_secs: 5,
            pause_ms: 0,
        }
    }
}

// =============================================================================
// Transcript Configuration
// =============================================================================

/// Controller call recording.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Record every controller call
    pub enabled: bool,

    /// JSON lines file the calls are appended to
    pub path: PathBuf,
}

impl TranscriptConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("transcript.path"));
        }
        Ok(())
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("./transcripts/controller.jsonl"),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json, compact)
    pub format: String,
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.level.clone()));
        }

        let valid_formats = ["text", "json", "compact"];
        if !valid_formats.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(self.format.clone()));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
