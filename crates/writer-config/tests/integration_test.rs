//! Integration tests for writer-config
//!
//! These tests verify config loading with real file system operations.

use writer_config::testing::TestEnvironment;
use writer_config::{Config, ConfigError, LogLevel};

/// Test config loading from a real config file
#[test]
fn test_load_config_from_file() {
    let env = TestEnvironment::new().unwrap();
    let path = env
        .write_config(
            r#"
[logging]
syslog = false
syslog_ident = "aesd-writer"
syslog_level = "info"
console_level = "warn"
"#,
        )
        .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert!(!config.logging.syslog);
    assert_eq!(config.logging.syslog_ident.as_deref(), Some("aesd-writer"));
    assert_eq!(config.logging.syslog_level, LogLevel::Info);
    assert_eq!(config.logging.console_level, LogLevel::Warn);
}

/// Missing keys fall back to defaults
#[test]
fn test_partial_config_uses_defaults() {
    let env = TestEnvironment::new().unwrap();
    let path = env.write_config("[logging]\nsyslog_level = \"error\"\n").unwrap();

    let config = Config::load_from(&path).unwrap();

    assert!(config.logging.syslog);
    assert!(config.logging.syslog_ident.is_none());
    assert_eq!(config.logging.syslog_level, LogLevel::Error);
    assert_eq!(config.logging.console_level, LogLevel::Off);
}

#[test]
fn test_empty_config_is_default() {
    let env = TestEnvironment::new().unwrap();
    let path = env.write_config("").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.logging.syslog);
}

#[test]
fn test_invalid_toml_is_error() {
    let env = TestEnvironment::new().unwrap();
    let path = env.write_config("[logging\nsyslog = ").unwrap();

    assert!(matches!(Config::load_from(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn test_unknown_level_is_error() {
    let env = TestEnvironment::new().unwrap();
    let path = env
        .write_config("[logging]\nsyslog_level = \"chatty\"\n")
        .unwrap();

    assert!(matches!(Config::load_from(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let env = TestEnvironment::new().unwrap();

    let result = Config::load_from(&env.root().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_default_toml_parses_back() {
    let toml_str = Config::default_toml().unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed.logging.syslog_level, LogLevel::Debug);
}
