//! In-memory registry for tests

use super::{AppAuthPubConfig, Pkg, PkgVersion, RegistryClient, RegistryError, VersionMeta};
use crate::graph::traversal::walk_unique;
use crate::model::ProjectDependency;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry serving packages registered through the `with_*` builders
///
/// Every call is recorded as `"<method> <id>"` and can be inspected with
/// [`MockRegistryClient::calls`].
#[derive(Debug, Default)]
pub struct MockRegistryClient {
    pkgs_by_project: HashMap<String, Pkg>,
    versions: HashMap<String, PkgVersion>,
    metas: HashMap<String, VersionMeta>,
    auth_enabled: HashSet<String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `dep` as the latest version of its package
    ///
    /// Registers the package, its version (with transitive models) and a
    /// metadata entry carrying the same version.
    pub fn with_published(mut self, dep: Arc<ProjectDependency>) -> Self {
        let pkg = Pkg {
            id: dep.pkg_id.clone(),
            project_id: dep.project_id.clone(),
            name: dep.name.clone(),
        };
        let transitive_models = walk_unique(&dep.site);
        self.metas.insert(
            dep.pkg_id.clone(),
            VersionMeta {
                pkg_id: dep.pkg_id.clone(),
                version: dep.version.clone(),
                description: None,
                published_at: None,
                tags: Vec::new(),
            },
        );
        self.versions.insert(
            dep.pkg_id.clone(),
            PkgVersion {
                model: Arc::clone(&dep),
                transitive_models,
            },
        );
        self.pkgs_by_project.insert(dep.project_id.clone(), pkg);
        self
    }

    /// Register a package for `project_id` without any version
    pub fn with_pkg(mut self, project_id: &str, pkg: Pkg) -> Self {
        self.pkgs_by_project.insert(project_id.to_string(), pkg);
        self
    }

    pub fn with_meta(mut self, meta: VersionMeta) -> Self {
        self.metas.insert(meta.pkg_id.clone(), meta);
        self
    }

    pub fn with_auth_enabled(mut self, project_id: &str) -> Self {
        self.auth_enabled.insert(project_id.to_string());
        self
    }

    /// Make every request naming `id` (project or package id) fail
    pub fn with_failure(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, method: &str, id: &str) -> Result<(), RegistryError> {
        self.calls.lock().await.push(format!("{} {}", method, id));
        if self.failing.contains(id) {
            return Err(RegistryError::Unavailable {
                message: format!("mock failure for {}", id),
            });
        }
        Ok(())
    }
}

impl RegistryClient for MockRegistryClient {
    async fn get_pkg_by_project_id(&self, project_id: &str) -> Result<Option<Pkg>, RegistryError> {
        self.record("get_pkg_by_project_id", project_id).await?;
        Ok(self.pkgs_by_project.get(project_id).cloned())
    }

    async fn get_pkg_version(&self, pkg_id: &str) -> Result<PkgVersion, RegistryError> {
        self.record("get_pkg_version", pkg_id).await?;
        self.versions
            .get(pkg_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                id: pkg_id.to_string(),
            })
    }

    async fn get_pkg_version_meta(&self, pkg_id: &str) -> Result<VersionMeta, RegistryError> {
        self.record("get_pkg_version_meta", pkg_id).await?;
        self.metas
            .get(pkg_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                id: pkg_id.to_string(),
            })
    }

    async fn get_app_auth_pub_config(
        &self,
        project_id: &str,
    ) -> Result<AppAuthPubConfig, RegistryError> {
        self.record("get_app_auth_pub_config", project_id).await?;
        Ok(AppAuthPubConfig {
            is_auth_enabled: self.auth_enabled.contains(project_id),
        })
    }
}

#[cfg(test)]
mod tests {
    include!("mock.test.rs");
}
