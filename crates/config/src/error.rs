//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write configuration file
    #[error("Failed to write config file at {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize configuration as TOML
    #[error("Failed to serialize TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Frame limit cannot be zero
    #[error("Invalid max_frame_bytes: must be positive, got {0}")]
    InvalidFrameLimit(usize),

    /// Port binding with an empty name
    #[error("Invalid port binding: name must not be empty")]
    EmptyPortName,

    /// Port 0 is never assigned
    #[error("Invalid port binding for {0}: port 0 is reserved")]
    ReservedPort(String),

    /// Same name bound twice
    #[error("Duplicate port name: {0}")]
    DuplicatePortName(String),

    /// Same port number bound twice
    #[error("Duplicate port number: {0}")]
    DuplicatePortNumber(u32),

    /// Invalid first block height
    #[error("Invalid start height: must be at least 1, got {0}")]
    InvalidStartHeight(i64),

    /// Invalid genesis time
    #[error("Invalid genesis time: must not be negative, got {0}")]
    InvalidGenesisTime(i64),

    /// Invalid block interval
    #[error("Invalid block interval: must be at least 1 second, got {0}")]
    InvalidBlockInterval(i64),

    /// Invalid log level
    #[error("Invalid log level: {0}. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Invalid log format
    #[error("Invalid log format: {0}. Valid values: text, json, compact")]
    InvalidLogFormat(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
