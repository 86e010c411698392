//! # writer-config
//!
//! Configuration management for writer.
//!
//! Loads configuration from:
//! 1. `~/.writer/config.toml` (global)
//! 2. Environment variables (highest priority)
//!
//! Only the logging side of the tool is configurable. Where and how the
//! payload is written is fixed by the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod logging;
pub mod syslog;
pub mod testing;

pub use logging::LogLevel;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the standard location, then apply env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::global_config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Config::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a single config file without env overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Global config path: ~/.writer/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".writer/config.toml"))
    }

    /// Apply WRITER_SYSLOG, WRITER_SYSLOG_IDENT and WRITER_SYSLOG_LEVEL
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("WRITER_SYSLOG") {
            self.logging.syslog = !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }
        if let Some(ident) = var("WRITER_SYSLOG_IDENT") {
            if !ident.is_empty() {
                self.logging.syslog_ident = Some(ident);
            }
        }
        if let Some(level) = var("WRITER_SYSLOG_LEVEL") {
            if let Ok(level) = level.parse() {
                self.logging.syslog_level = level;
            }
        }
    }

    /// Generate default config TOML string
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Config::default())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Forward records to the system log (LOG_USER facility)
    pub syslog: bool,
    /// Syslog ident; the program name when unset
    pub syslog_ident: Option<String>,
    /// Most verbose level forwarded to syslog
    pub syslog_level: LogLevel,
    /// Console (stderr) level when neither WRITER_LOG nor RUST_LOG is set
    pub console_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            syslog: true,
            syslog_ident: None,
            syslog_level: LogLevel::Debug,
            console_level: LogLevel::Off,
        }
    }
}
