//! Single-version closure maps and the checks built on them
//!
//! A [`DependencyMap`] is the resolved transitive closure of some root, keyed
//! by package id. Building one fails as soon as a package shows up with two
//! different versions. Versions are compared as exact strings: `1.0` and
//! `1.0.0` conflict.

use super::DependencyError;
use super::traversal::TraversalRoot;
use crate::model::ProjectDependency;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::trace;

/// Package id to the single dependency model resolved for it
pub type DependencyMap = BTreeMap<String, Arc<ProjectDependency>>;

/// Resolve the transitive closure of `root`, enforcing one version per package
///
/// Breadth-first; a package already resolved at the same version is not
/// expanded again.
pub fn build_map<'a>(root: impl Into<TraversalRoot<'a>>) -> Result<DependencyMap, DependencyError> {
    let mut map = DependencyMap::new();
    let mut queue: VecDeque<Arc<ProjectDependency>> = root.into().seeds().into();

    while let Some(dep) = queue.pop_front() {
        match map.get(&dep.pkg_id) {
            Some(existing) if existing.version != dep.version => {
                return Err(DependencyError::VersionConflict {
                    pkg_id: dep.pkg_id.clone(),
                    name: dep.name.clone(),
                    version_a: existing.version.clone(),
                    version_b: dep.version.clone(),
                });
            }
            Some(_) => {
                trace!("{} already resolved at {}", dep.pkg_id, dep.version);
            }
            None => {
                queue.extend(dep.site.project_dependencies.iter().cloned());
                map.insert(dep.pkg_id.clone(), dep);
            }
        }
    }

    Ok(map)
}

/// Check that an imported closure agrees with the local one on every shared package
///
/// `version_a` of a reported conflict is the local version, `version_b` the
/// imported one.
pub fn check_compatible(local: &DependencyMap, imported: &DependencyMap) -> Result<(), DependencyError> {
    for (pkg_id, dep) in imported {
        if let Some(existing) = local.get(pkg_id)
            && existing.version != dep.version
        {
            return Err(DependencyError::VersionConflict {
                pkg_id: pkg_id.clone(),
                name: dep.name.clone(),
                version_a: existing.version.clone(),
                version_b: dep.version.clone(),
            });
        }
    }
    Ok(())
}

/// Reject an import whose closure contains the importing project's own package
///
/// Projects that were never published have no package id and cannot be
/// depended upon, so `host_pkg_id = None` always passes.
pub fn check_cycle(
    host_pkg_id: Option<&str>,
    imported: &DependencyMap,
    imported_project_id: &str,
) -> Result<(), DependencyError> {
    match host_pkg_id {
        Some(pkg_id) if imported.contains_key(pkg_id) => Err(DependencyError::CircularDependency {
            imported_project_id: imported_project_id.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    include!("resolver.test.rs");
}
