//! Display names for dependencies
//!
//! Hostless packages are published from internal projects whose names are not
//! meant for users. A catalog file maps those projects to friendly names:
//!
//! ```toml
//! [[hostless]]
//! name = "Ant Design"
//! project_id = ["antd-v4", "antd-v5"]   # the last id is the current one
//! ```

use crate::model::ProjectDependency;
use crate::primitives::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostlessProjectId {
    Single(String),
    /// Historical ids, oldest first
    Versions(Vec<String>),
}

impl HostlessProjectId {
    pub fn matches(&self, project_id: &str) -> bool {
        match self {
            HostlessProjectId::Single(id) => id == project_id,
            HostlessProjectId::Versions(ids) => ids.last().is_some_and(|id| id == project_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostlessComponent {
    pub name: String,
    pub project_id: HostlessProjectId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostlessCatalog {
    #[serde(default)]
    pub hostless: Vec<HostlessComponent>,
}

impl HostlessCatalog {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogReadError {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog =
            Self::from_toml_str(&content).map_err(|source| ConfigError::CatalogParseError {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "Loaded {} hostless entries from {}",
            catalog.hostless.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// `hostless.toml` in the per-user config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "projdeps").map(|dirs| dirs.config_dir().join("hostless.toml"))
    }

    /// Catalog name when `dep` comes from a listed hostless project, else the dependency name
    pub fn display_name<'a>(&'a self, dep: &'a ProjectDependency) -> &'a str {
        self.hostless
            .iter()
            .find(|entry| entry.project_id.matches(&dep.project_id))
            .map(|entry| entry.name.as_str())
            .unwrap_or(&dep.name)
    }
}

#[cfg(test)]
mod tests {
    include!("naming.test.rs");
}
