//! Configuration loading and global state management
//!
//! Coordinates loading configuration from various sources and provides
//! global application configuration access.

use crate::primitives::ConfigError;
use std::sync::OnceLock;

use super::{config::AppConfig, env::EnvironmentConfig};

// Global configuration available throughout the application
static GLOBAL_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Files read into the process environment, first match wins per variable
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

impl AppConfig {
    /// Load .env files into the process environment
    ///
    /// Must run before CLI parsing so clap's `env` fallbacks see the values.
    pub fn load_env_files() -> Result<(), ConfigError> {
        for env_file in ENV_FILES {
            if let Err(e) = dotenvy::from_filename(env_file) {
                // Missing files are fine, unreadable or malformed ones are not
                if !e.not_found() {
                    return Err(ConfigError::EnvFileError {
                        file: env_file.to_string(),
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve config: defaults -> env vars -> CLI
    pub fn resolve(cli: AppConfig) -> Result<Self, ConfigError> {
        Self::resolve_with_env(cli, &EnvironmentConfig::load()?)
    }

    /// Resolve against an explicit environment snapshot
    pub fn resolve_with_env(cli: AppConfig, env: &EnvironmentConfig) -> Result<Self, ConfigError> {
        // 1. Start with defaults
        let mut config = Self::default();

        // 2. Standard color variables
        config.color = env.apply_color_config(config.color);

        // 3. Override with CLI arguments (highest precedence)
        config = config.merge_with(cli);

        // 4. Post-process and validate
        config.validate()?;

        Ok(config)
    }

    /// Initialize global configuration (call once in main)
    pub fn init_global(config: AppConfig) -> Result<(), ConfigError> {
        GLOBAL_CONFIG
            .set(config)
            .map_err(|_| ConfigError::AlreadyInitialized)
    }

    /// Get global configuration reference, if initialized
    pub fn global() -> Option<&'static AppConfig> {
        GLOBAL_CONFIG.get()
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
