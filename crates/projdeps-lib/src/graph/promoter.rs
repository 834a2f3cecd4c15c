//! Transitive dependencies that must become direct
//!
//! If project A imports B, B imports C, and a component of B renders an
//! instance of C's component in a default slot, then instantiating B's
//! component in A materializes C instances that A can copy and move around
//! like any other instance. A therefore needs C as a direct dependency.
//! Hostless packages pulled in transitively are promoted for the same reason.

use super::traversal::walk_unique;
use crate::model::{Component, ProjectDependency};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Computes promotions against a direct dependency list
#[derive(Debug)]
pub struct TransitivePromoter {
    direct_ids: HashSet<String>,
    closure: Vec<Arc<ProjectDependency>>,
}

impl TransitivePromoter {
    /// `direct` is the host's direct list, including the dependency being imported
    pub fn new(direct: &[Arc<ProjectDependency>]) -> Self {
        Self {
            direct_ids: direct.iter().map(|d| d.pkg_id.clone()).collect(),
            closure: walk_unique(direct),
        }
    }

    fn is_direct(&self, dep: &ProjectDependency) -> bool {
        self.direct_ids.contains(&dep.pkg_id)
    }

    /// Transitive owners of components used in the default slots of `components`
    ///
    /// Only reusable components are considered; frame wrappers are never
    /// instantiated by importers.
    pub fn from_default_slots<'c>(
        &self,
        components: impl IntoIterator<Item = &'c Component>,
    ) -> Vec<Arc<ProjectDependency>> {
        let mut owners: HashMap<&str, &Arc<ProjectDependency>> = HashMap::new();
        for dep in &self.closure {
            for component in &dep.site.components {
                owners.entry(component.uuid.as_str()).or_insert(dep);
            }
        }

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for component in components.into_iter().filter(|c| c.is_reusable()) {
            for uuid in component.default_slot_components() {
                let Some(owner) = owners.get(uuid) else {
                    continue;
                };
                if !self.is_direct(owner) && seen.insert(owner.pkg_id.as_str()) {
                    debug!(
                        "Promoting {} (default slot content of {})",
                        owner, component.name
                    );
                    result.push(Arc::clone(owner));
                }
            }
        }
        result
    }

    /// Hostless packages reachable only transitively
    pub fn hostless_packages(&self) -> Vec<Arc<ProjectDependency>> {
        self.closure
            .iter()
            .filter(|dep| dep.is_hostless() && !self.is_direct(dep))
            .cloned()
            .collect()
    }

    /// Everything that must be promoted after importing `imported`, deduplicated by package id
    pub fn promote(&self, imported: &ProjectDependency) -> Vec<Arc<ProjectDependency>> {
        let mut seen = HashSet::new();
        self.from_default_slots(&imported.site.components)
            .into_iter()
            .chain(self.hostless_packages())
            .filter(|dep| seen.insert(dep.pkg_id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    include!("promoter.test.rs");
}
