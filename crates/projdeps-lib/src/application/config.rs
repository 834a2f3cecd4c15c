//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::manager::HostlessCatalog;
use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration values
pub mod defaults {
    pub const REGISTRY_URL: &str = "http://localhost:3003";
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const NET_TIMEOUT: &str = "30";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn registry_url() -> String {
        defaults::REGISTRY_URL.to_string()
    }

    pub fn log_level() -> u8 {
        0
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn net_timeout() -> u64 {
        30
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> ColorIntent {
        ColorIntent::Auto
    }
}

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Parser, Deserialize)]
pub struct AppConfig {
    /// Base URL of the package registry
    #[arg(short, long, env = "PROJDEPS_REGISTRY_URL", default_value = defaults::REGISTRY_URL)]
    #[serde(default = "default_fns::registry_url")]
    pub registry_url: String,

    /// Registry request timeout in seconds
    #[arg(short, long, env = "PROJDEPS_NET_TIMEOUT", default_value = defaults::NET_TIMEOUT)]
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// TOML file naming hostless packages
    #[arg(long, env = "PROJDEPS_HOSTLESS_CONFIG")]
    #[serde(default)]
    pub hostless_config: Option<PathBuf>,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "PROJDEPS_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Log format (text, json, yaml)
    #[arg(long, env = "PROJDEPS_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "PROJDEPS_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "PROJDEPS_COLOR", default_value = defaults::COLOR)]
    #[serde(default = "default_fns::color")]
    pub color: ColorIntent,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry_url: default_fns::registry_url(),
            net_timeout: default_fns::net_timeout(),
            hostless_config: None,
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig, resolving color against the log stream
    pub fn to_logger_config(&self, is_terminal: bool) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            ansi: self.color.use_ansi(is_terminal),
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if other.hostless_config.is_some() {
            self.hostless_config = other.hostless_config;
        }

        if other.registry_url != default_fns::registry_url() {
            self.registry_url = other.registry_url;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }

        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorIntent::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let url = self.registry_url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed {
                reason: format!("registry URL must be http(s): {}", self.registry_url),
            });
        }
        self.registry_url = url.to_string();

        if self.net_timeout == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "net timeout must be at least 1 second".to_string(),
            });
        }

        // Fall back to the per-user catalog when it exists
        if self.hostless_config.is_none() {
            self.hostless_config = HostlessCatalog::default_path().filter(|p| p.is_file());
        }

        Ok(())
    }

    /// Hostless catalog named by the config, or an empty one
    pub fn load_catalog(&self) -> Result<HostlessCatalog, ConfigError> {
        match &self.hostless_config {
            Some(path) => HostlessCatalog::load(path),
            None => Ok(HostlessCatalog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
