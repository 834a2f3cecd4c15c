//! HTTP registry client

use super::{AppAuthPubConfig, Pkg, PkgVersion, RegistryClient, RegistryError, VersionMeta};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Deserialize)]
struct PkgEnvelope<T> {
    pkg: Option<T>,
}

/// Registry client speaking the `/api/v1` JSON API
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    client: Client,
    base_url: String,
}

impl HttpRegistryClient {
    /// Build a client with its own connection pool
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the body; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, RegistryError> {
        let url = format!("{}{}", self.base_url, path);
        trace!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} not found", url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

impl RegistryClient for HttpRegistryClient {
    async fn get_pkg_by_project_id(&self, project_id: &str) -> Result<Option<Pkg>, RegistryError> {
        let envelope: Option<PkgEnvelope<Pkg>> = self
            .get_json(&format!("/api/v1/projects/{}/pkg", project_id))
            .await?;
        Ok(envelope.and_then(|e| e.pkg))
    }

    async fn get_pkg_version(&self, pkg_id: &str) -> Result<PkgVersion, RegistryError> {
        self.get_json(&format!("/api/v1/pkgs/{}", pkg_id))
            .await?
            .ok_or_else(|| RegistryError::NotFound {
                id: pkg_id.to_string(),
            })
    }

    async fn get_pkg_version_meta(&self, pkg_id: &str) -> Result<VersionMeta, RegistryError> {
        let envelope: Option<PkgEnvelope<VersionMeta>> = self
            .get_json(&format!("/api/v1/pkgs/{}/meta", pkg_id))
            .await?;
        envelope
            .and_then(|e| e.pkg)
            .ok_or_else(|| RegistryError::NotFound {
                id: pkg_id.to_string(),
            })
    }

    async fn get_app_auth_pub_config(
        &self,
        project_id: &str,
    ) -> Result<AppAuthPubConfig, RegistryError> {
        // Projects without a published app have no auth settings
        Ok(self
            .get_json(&format!("/api/v1/projects/{}/app-auth/pub-config", project_id))
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    include!("http.test.rs");
}
