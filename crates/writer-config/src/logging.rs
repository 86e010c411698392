//! Structured logging utilities for writer.
//!
//! Records go through `tracing`. The console layer writes to stderr and is
//! silent unless asked for; the syslog layer forwards to the system log
//! under the `LOG_USER` facility.
//!
//! # Usage
//!
//! ```ignore
//! use writer_config::log_writer_debug;
//!
//! log_writer_debug!("Writing '{}' to '{}'", payload, path);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::syslog::{LibcSyslog, SyslogLayer};
use crate::LoggingConfig;

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const WRITER: &'static str = "WRITER";
}

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(ParseLogLevelError(other.to_string())),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[macro_export]
macro_rules! log_writer_error {
    ($($arg:tt)+) => {
        tracing::error!(component = "WRITER", $($arg)+)
    };
}

#[macro_export]
macro_rules! log_writer_warn {
    ($($arg:tt)+) => {
        tracing::warn!(component = "WRITER", $($arg)+)
    };
}

#[macro_export]
macro_rules! log_writer_info {
    ($($arg:tt)+) => {
        tracing::info!(component = "WRITER", $($arg)+)
    };
}

#[macro_export]
macro_rules! log_writer_debug {
    ($($arg:tt)+) => {
        tracing::debug!(component = "WRITER", $($arg)+)
    };
}

/// Initialize logging from the logging config.
/// Call this once at application startup.
pub fn init_logging(config: &LoggingConfig) {
    let console_filter = EnvFilter::try_from_env("WRITER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(config.console_level.as_str()));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let syslog = config.syslog.then(|| {
        SyslogLayer::new(LibcSyslog::open(config.syslog_ident.as_deref()))
            .with_filter(LevelFilter::from(config.syslog_level))
    });

    tracing_subscriber::registry()
        .with(console)
        .with(syslog)
        .init();
}
