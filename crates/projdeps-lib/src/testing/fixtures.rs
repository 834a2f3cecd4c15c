//! Builders for materialized dependency trees
//!
//! Naming is derived from the package id so assertions stay short:
//! package `a` is named `a`, belongs to project `proj-a` and its site uuid is
//! `site-a-<version>`.

use crate::model::{HostProject, ProjectDependency, Site};
use std::sync::Arc;

pub fn project_id_for(pkg_id: &str) -> String {
    format!("proj-{}", pkg_id)
}

pub fn site_uuid_for(pkg_id: &str, version: &str) -> String {
    format!("site-{}-{}", pkg_id, version)
}

/// Dependency with the given site, as-is
pub fn dep_with_site(pkg_id: &str, version: &str, site: Site) -> Arc<ProjectDependency> {
    Arc::new(ProjectDependency::new(
        pkg_id,
        version,
        pkg_id,
        project_id_for(pkg_id),
        site,
    ))
}

/// Dependency whose site only lists `children`
pub fn dep(pkg_id: &str, version: &str, children: &[Arc<ProjectDependency>]) -> Arc<ProjectDependency> {
    let mut site = Site::new(site_uuid_for(pkg_id, version));
    site.project_dependencies = children.to_vec();
    dep_with_site(pkg_id, version, site)
}

pub fn leaf(pkg_id: &str, version: &str) -> Arc<ProjectDependency> {
    dep(pkg_id, version, &[])
}

/// Hostless package named `hostless_name` that requires the hostless packages in `requires`
pub fn hostless_dep(
    pkg_id: &str,
    version: &str,
    hostless_name: &str,
    requires: &[&str],
) -> Arc<ProjectDependency> {
    let site = Site::new(site_uuid_for(pkg_id, version)).with_hostless(hostless_name, requires);
    dep_with_site(pkg_id, version, site)
}

/// Host project `project_id` directly importing `deps`
pub fn host(project_id: &str, deps: &[Arc<ProjectDependency>]) -> HostProject {
    let mut site = Site::new(format!("site-{}", project_id));
    site.project_dependencies = deps.to_vec();
    HostProject::new(project_id, site)
}
