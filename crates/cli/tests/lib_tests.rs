//! Tests for lib.rs constants and default paths

use blockbridge_cli::{
    default_config_path, default_data_dir, APP_NAME, DEFAULT_CONFIG_FILE, DEFAULT_DATA_DIR,
};

#[test]
fn test_constants() {
    assert_eq!(APP_NAME, "blockbridge");
    assert_eq!(DEFAULT_CONFIG_FILE, "blockbridge.toml");
    assert_eq!(DEFAULT_DATA_DIR, ".blockbridge");
}

#[test]
fn test_default_paths() {
    let data_dir = default_data_dir();
    assert!(data_dir.ends_with(DEFAULT_DATA_DIR));

    let config_path = default_config_path();
    assert!(config_path.ends_with(DEFAULT_CONFIG_FILE));
}
