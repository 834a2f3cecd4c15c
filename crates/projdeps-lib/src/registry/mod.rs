//! Package registry client
//!
//! The dependency manager only talks to the registry through
//! [`RegistryClient`]. [`HttpRegistryClient`] is the production client;
//! `MockRegistryClient` serves canned packages for tests.

pub mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use http::HttpRegistryClient;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockRegistryClient;

use crate::model::ProjectDependency;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("JSON parsing failed: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Registry returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Not found in registry: {id}")]
    NotFound { id: String },

    #[error("Registry unavailable: {message}")]
    Unavailable { message: String },
}

/// A published package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pkg {
    pub id: String,
    pub project_id: String,
    pub name: String,
}

/// Latest version of a package, materialized
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkgVersion {
    pub model: Arc<ProjectDependency>,
    /// Every package the model depends on, transitively
    #[serde(default)]
    pub transitive_models: Vec<Arc<ProjectDependency>>,
}

/// Publication metadata of a package's latest version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMeta {
    pub pkg_id: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppAuthPubConfig {
    pub is_auth_enabled: bool,
}

/// Registry operations the dependency manager relies on
pub trait RegistryClient: Send + Sync {
    /// The package published from `project_id`, or `None` if it was never published
    fn get_pkg_by_project_id(
        &self,
        project_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Pkg>, RegistryError>> + Send;

    /// Latest version of `pkg_id` together with its transitive models
    fn get_pkg_version(
        &self,
        pkg_id: &str,
    ) -> impl std::future::Future<Output = Result<PkgVersion, RegistryError>> + Send;

    fn get_pkg_version_meta(
        &self,
        pkg_id: &str,
    ) -> impl std::future::Future<Output = Result<VersionMeta, RegistryError>> + Send;

    /// Access-control settings of the app published from `project_id`
    fn get_app_auth_pub_config(
        &self,
        project_id: &str,
    ) -> impl std::future::Future<Output = Result<AppAuthPubConfig, RegistryError>> + Send;
}
