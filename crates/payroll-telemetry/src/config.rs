//! Logging configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error, or directives)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Append logs to this file instead of stderr
    pub log_file: Option<PathBuf>,

    /// ANSI colors on stderr output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "payroll".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            log_file: None,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PAYROLL_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `PAYROLL_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `PAYROLL_LOG_FILE`: Log file path (default: stderr)
    pub fn from_env(service_name: &str) -> Self {
        Self::from_lookup(service_name, |key| env::var(key).ok())
    }

    pub fn from_lookup(service_name: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service_name: service_name.to_string(),

            log_level: lookup("PAYROLL_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs: lookup("PAYROLL_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),

            log_file: lookup("PAYROLL_LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            ansi: true,
        }
    }

    /// Route logs to `path` unless a file was already configured.
    pub fn with_default_file(mut self, path: impl Into<PathBuf>) -> Self {
        if self.log_file.is_none() {
            self.log_file = Some(path.into());
        }
        self
    }
}
