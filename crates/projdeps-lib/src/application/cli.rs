use crate::primitives::ConfigError;
use clap::{Parser, Subcommand};

use super::config::AppConfig;

/// projdeps CLI - project package dependency inspection
#[derive(Debug, Clone, Parser)]
#[command(name = "projdeps")]
#[command(about = "Inspect and validate design-project package dependencies")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// projdeps commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load config: defaults -> .env -> env vars -> CLI
    pub fn load() -> Result<Self, ConfigError> {
        AppConfig::load_env_files()?;
        let cli = Cli::parse();
        Self::from_cli(cli)
    }

    /// Resolve an already-parsed command line
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            app_config: AppConfig::resolve(cli.config)?,
            command: cli.command,
        })
    }
}

/// Available projdeps commands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Print the resolved dependency closure of a published project
    Resolve {
        #[arg(help = "Project whose latest published version is resolved")]
        project_id: String,
    },

    /// Dry-run importing one project into another
    CheckImport {
        /// Project receiving the import
        #[arg(long, help = "Project that would receive the import")]
        host: String,

        #[arg(help = "Project to import")]
        candidate: String,
    },

    /// List packages that directly depend on a package
    Dependents {
        #[arg(help = "Project whose dependency tree is searched")]
        project_id: String,

        #[arg(help = "Package id to find dependents of")]
        pkg_id: String,
    },
}

impl Commands {
    /// Subcommand name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Resolve { .. } => "resolve",
            Commands::CheckImport { .. } => "check-import",
            Commands::Dependents { .. } => "dependents",
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
