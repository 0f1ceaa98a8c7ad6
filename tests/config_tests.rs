//! Integration tests for the layered configuration.
//!
//! These tests verify defaults, TOML file parsing, environment overrides,
//! CLI overrides and error reporting for bad sources.

use clap::Parser;
use dupsweep::actions::DeleteMethod;
use dupsweep::cli::Cli;
use dupsweep::config::{Config, ConfigError};
use dupsweep::duplicates::SortOrder;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all DUPSWEEP_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("DUPSWEEP_") {
            std::env::remove_var(key);
        }
    }
}

// =============================================================================
// File Layer
// =============================================================================

#[test]
fn test_config_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(Some(&temp_dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
sort_order = "ascending"
extension = ".jpg"
io_threads = 8
lowercase_names = true
continue_on_error = true
delete_method = "trash"
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.sort_order, Some(SortOrder::Ascending));
    assert_eq!(config.extension.as_deref(), Some(".jpg"));
    assert_eq!(config.io_threads, 8);
    assert!(config.lowercase_names);
    assert!(config.continue_on_error);
    assert_eq!(config.delete_method, DeleteMethod::Trash);
}

#[test]
fn test_config_partial_file_keeps_other_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 2\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.io_threads, 2);
    assert_eq!(config.sort_order, None);
    assert_eq!(config.delete_method, DeleteMethod::Permanent);
}

#[test]
fn test_config_explicit_missing_file_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let result = Config::load(Some(&temp_dir.path().join("nope.toml")));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_config_invalid_type_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = \"eight\"\n").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("io_threads"));
}

#[test]
fn test_config_invalid_enum_value() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "delete_method = \"shred\"\n").unwrap();

    assert!(matches!(
        Config::load(Some(&config_path)),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_config_zero_threads_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 0\n").unwrap();

    assert!(matches!(
        Config::load(Some(&config_path)),
        Err(ConfigError::InvalidValue { field: "io_threads", .. })
    ));
}

#[test]
fn test_config_malformed_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = [\n").unwrap();

    assert!(matches!(
        Config::load(Some(&config_path)),
        Err(ConfigError::Invalid(_))
    ));
}

// =============================================================================
// Override Hierarchy
// =============================================================================

#[test]
fn test_config_hierarchy_defaults_file_env_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    // 1. File overrides defaults
    fs::write(
        &config_path,
        "sort_order = \"descending\"\nio_threads = 8\nextension = \".md\"\n",
    )
    .unwrap();

    // 2. Environment overrides the file
    std::env::set_var("DUPSWEEP_SORT_ORDER", "ascending");
    std::env::set_var("DUPSWEEP_DELETE_METHOD", "trash");

    let mut config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.sort_order, Some(SortOrder::Ascending));
    assert_eq!(config.delete_method, DeleteMethod::Trash);
    assert_eq!(config.io_threads, 8);
    assert_eq!(config.extension.as_deref(), Some(".md"));

    // 3. CLI overrides the environment and the file
    let cli = Cli::try_parse_from([
        "dupsweep",
        "/tmp",
        "--sort",
        "descending",
        "--io-threads",
        "16",
    ])
    .unwrap();
    config.merge_cli(&cli);
    assert_eq!(config.sort_order, Some(SortOrder::Descending));
    assert_eq!(config.io_threads, 16);
    assert_eq!(config.extension.as_deref(), Some(".md"));

    clear_env();
}

#[test]
fn test_env_only_configuration() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    std::env::set_var("DUPSWEEP_IO_THREADS", "3");
    std::env::set_var("DUPSWEEP_CONTINUE_ON_ERROR", "true");

    let config = Config::load_from_path(None).unwrap();
    assert_eq!(config.io_threads, 3);
    assert!(config.continue_on_error);

    clear_env();
}

#[test]
fn test_cli_switches_only_turn_options_on() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "lowercase_names = true\n").unwrap();

    let mut config = Config::load(Some(&config_path)).unwrap();
    let cli = Cli::try_parse_from(["dupsweep", "/tmp"]).unwrap();
    config.merge_cli(&cli);

    assert!(config.lowercase_names);
    assert_eq!(config.delete_method, DeleteMethod::Permanent);
}
