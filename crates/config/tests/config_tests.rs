//! Tests for Config module

use blockbridge_config::{
    default_ports, Config, ConfigError, ControllerConfig, HostConfig, LoggingConfig, PortBinding,
    TranscriptConfig, DEFAULT_MAX_FRAME_BYTES,
};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.controller.max_frame_bytes, DEFAULT_MAX_FRAME_BYTES);
    assert!(!config.controller.dry_run);
    assert_eq!(config.ports, default_ports());
    assert_eq!(config.port_for("storage"), Some(1));
    assert_eq!(config.host.start_height, 1);
    assert!(!config.transcript.enabled);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = Config::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file() {
    let config = Config::from_str(
        r#"
[controller]
command = "node"
args = ["controller.js", "--verbose"]

[host]
start_height = 500
genesis_time = 1700000000

[[ports]]
name = "storage"
port = 7

[[ports]]
name = "timer"
port = 8
"#,
    )
    .unwrap();

    assert_eq!(config.controller.describe(), "node controller.js --verbose");
    assert_eq!(config.controller.max_frame_bytes, DEFAULT_MAX_FRAME_BYTES);
    assert_eq!(config.host.start_height, 500);
    assert_eq!(config.host.block_interval_secs, 5);
    assert_eq!(config.port_for("storage"), Some(7));
    assert_eq!(config.port_for("timer"), Some(8));
    assert_eq!(config.port_for("bank"), None);
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blockbridge.toml");

    let mut config = Config::default();
    config.controller.command = "controller-bin".to_string();
    config.transcript.enabled = true;
    config.ports.push(PortBinding::new("timer", 2));
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = Config::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead { .. })));
}

#[test]
fn test_invalid_toml() {
    let result = Config::from_str("[controller\ncommand = 1");
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_missing_command() {
    let mut config = ControllerConfig::default();
    config.command = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingField("controller.command"))
    ));

    config.dry_run = true;
    assert!(config.validate().is_ok());
    assert_eq!(config.describe(), "dry-run");
}

#[test]
fn test_zero_frame_limit() {
    let mut config = ControllerConfig::default();
    config.max_frame_bytes = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidFrameLimit(0))
    ));
}

#[test]
fn test_port_validation() {
    let mut config = Config::default();

    config.ports = vec![PortBinding::new("", 3)];
    assert!(matches!(config.validate(), Err(ConfigError::EmptyPortName)));

    config.ports = vec![PortBinding::new("storage", 0)];
    assert!(matches!(config.validate(), Err(ConfigError::ReservedPort(_))));

    config.ports = vec![PortBinding::new("storage", 1), PortBinding::new("storage", 2)];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DuplicatePortName(name)) if name == "storage"
    ));

    config.ports = vec![PortBinding::new("storage", 4), PortBinding::new("timer", 4)];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DuplicatePortNumber(4))
    ));

    config.ports = Vec::new();
    assert!(config.validate().is_ok());
}

#[test]
fn test_host_validation() {
    let mut host = HostConfig::default();
    host.start_height = 0;
    assert!(matches!(host.validate(), Err(ConfigError::InvalidStartHeight(0))));

    let mut host = HostConfig::default();
    host.genesis_time = -1;
    assert!(matches!(host.validate(), Err(ConfigError::InvalidGenesisTime(-1))));

    let mut host = HostConfig::default();
    host.block_interval_secs = 0;
    assert!(matches!(
        host.validate(),
        Err(ConfigError::InvalidBlockInterval(0))
    ));
}

#[test]
fn test_host_block_schedule() {
    let host = HostConfig {
        start_height: 500,
        genesis_time: 1_700_000_000,
        block_interval_secs: 6,
        pause_ms: 0,
    };

    let first = host.block_at(0).unwrap();
    assert_eq!(first.height, 500);
    assert_eq!(first.unix_seconds(), 1_700_000_000);

    let third = host.block_at(2).unwrap();
    assert_eq!(third.height, 502);
    assert_eq!(third.unix_seconds(), 1_700_000_012);

    assert!(host.block_at(u64::MAX).is_none());
}

#[test]
fn test_transcript_requires_path_when_enabled() {
    let config = TranscriptConfig {
        enabled: true,
        path: Default::default(),
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingField("transcript.path"))
    ));
}

#[test]
fn test_logging_validation() {
    let mut config = LoggingConfig::default();
    for format in ["text", "json", "compact", "JSON"] {
        config.format = format.to_string();
        assert!(config.validate().is_ok());
    }

    config.format = "pretty".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLogFormat(_))
    ));

    config.format = "text".to_string();
    config.level = "verbose".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidLogLevel(_))));
}
