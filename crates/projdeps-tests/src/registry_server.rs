//! Local registry backed by a mockito server
//!
//! Serves the same `/api/v1` JSON the real registry does, so tests exercise
//! `HttpRegistryClient` end to end.

use anyhow::Result;
use mockito::{Mock, Server, ServerGuard};
use projdeps_lib::graph::traversal::walk_unique;
use projdeps_lib::model::ProjectDependency;
use projdeps_lib::registry::{HttpRegistryClient, Pkg, PkgVersion, VersionMeta};
use serde_json::json;
use std::sync::Arc;

pub struct RegistryServer {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl RegistryServer {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
            mocks: Vec::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn client(&self) -> Result<Arc<HttpRegistryClient>> {
        Ok(Arc::new(HttpRegistryClient::new(&self.url(), 5)?))
    }

    /// Serve `dep` as the latest version of its package, with matching metadata
    pub async fn publish(&mut self, dep: &Arc<ProjectDependency>) -> Result<()> {
        let meta = VersionMeta {
            pkg_id: dep.pkg_id.clone(),
            version: dep.version.clone(),
            description: None,
            published_at: None,
            tags: Vec::new(),
        };
        self.publish_with_meta(dep, meta).await
    }

    /// Serve `dep` but advertise `meta` as its latest publication
    pub async fn publish_with_meta(
        &mut self,
        dep: &Arc<ProjectDependency>,
        meta: VersionMeta,
    ) -> Result<()> {
        let pkg = Pkg {
            id: dep.pkg_id.clone(),
            project_id: dep.project_id.clone(),
            name: dep.name.clone(),
        };
        let version = PkgVersion {
            model: Arc::clone(dep),
            transitive_models: walk_unique(&dep.site),
        };

        self.serve(
            &format!("/api/v1/projects/{}/pkg", dep.project_id),
            200,
            json!({ "pkg": pkg }).to_string(),
        )
        .await;
        self.serve(
            &format!("/api/v1/pkgs/{}", dep.pkg_id),
            200,
            serde_json::to_string(&version)?,
        )
        .await;
        self.serve(
            &format!("/api/v1/pkgs/{}/meta", dep.pkg_id),
            200,
            json!({ "pkg": meta }).to_string(),
        )
        .await;
        self.serve(
            &format!("/api/v1/projects/{}/app-auth/pub-config", dep.project_id),
            200,
            json!({ "isAuthEnabled": false }).to_string(),
        )
        .await;
        Ok(())
    }

    /// Answer lookups for a project that was never published
    pub async fn unpublished(&mut self, project_id: &str) {
        self.serve(
            &format!("/api/v1/projects/{}/pkg", project_id),
            200,
            json!({ "pkg": null }).to_string(),
        )
        .await;
    }

    /// Make the app behind `project_id` require authentication
    pub async fn protect(&mut self, pkg: &Pkg) {
        self.serve(
            &format!("/api/v1/projects/{}/pkg", pkg.project_id),
            200,
            json!({ "pkg": pkg }).to_string(),
        )
        .await;
        self.serve(
            &format!("/api/v1/projects/{}/app-auth/pub-config", pkg.project_id),
            200,
            json!({ "isAuthEnabled": true }).to_string(),
        )
        .await;
    }

    async fn serve(&mut self, path: &str, status: usize, body: String) {
        let mock = self
            .server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
    }
}
