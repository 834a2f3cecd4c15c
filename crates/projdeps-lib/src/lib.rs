//! # projdeps Library
//!
//! Dependency management for design-tool projects that import each other's
//! published packages.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Configuration, logging types and shared errors
//! - [`logger`] - Structured logging setup
//! - [`model`] - Materialized sites, packages and assets
//! - [`graph`] - Traversal, conflict and cycle checks, ownership, tracking
//! - [`registry`] - Package registry client
//! - [`manager`] - The [`DependencyManager`] façade over one host project
//! - [`application`] - CLI interface and configuration management
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! // Load configuration, initialize logging and run the requested command
//! projdeps_lib::main().await
//! # }
//! ```

pub mod application;
pub mod graph;
pub mod logger;
pub mod manager;
pub mod model;
pub mod primitives;
pub mod registry;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use graph::{DependencyError, DependencyGraph, DependencyGraphStore, DependencyRecord};
pub use logger::Logger;
pub use manager::{DependencyManager, HostlessCatalog, NoopHooks, ProjectHooks, SyncReport};
pub use model::{AssetRef, HostProject, ProjectDependency, Site};
pub use primitives::{ColorIntent, ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};
pub use registry::{HttpRegistryClient, RegistryClient, RegistryError};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;
use std::io::IsTerminal;

pub async fn main() -> Result<()> {
    // 1. Load configuration: defaults -> .env -> env vars -> CLI
    let config = CliConfig::load()?;

    // 2. Initialize logger against the stream it writes to
    let is_terminal = match config.app_config.log_output {
        LogOutput::Stderr => std::io::stderr().is_terminal(),
        LogOutput::Stdout => std::io::stdout().is_terminal(),
    };
    Logger::init(config.app_config.to_logger_config(is_terminal))?;

    // 3. Initialize global configuration
    AppConfig::init_global(config.app_config.clone())?;

    // 4. Execute the command
    execute_command(config).await
}
