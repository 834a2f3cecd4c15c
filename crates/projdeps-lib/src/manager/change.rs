//! Buffered project mutations
//!
//! A [`ProjectChange`] starts from a snapshot of the host site, collects every
//! write of one operation and applies them together in [`ProjectChange::commit`].
//! Until then neither the site nor the tracked dependencies are touched, so an
//! operation that bails out halfway simply drops its change.
//!
//! Anyone can open a change with [`ProjectChange::begin`], but only the
//! manager can commit one into its own state: its commit is private and the
//! host site is only handed out as `&Site`.

use crate::graph::{AssetOwnershipIndex, DependencyGraphStore};
use crate::model::{GlobalContext, ProjectDependency, Site};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct ProjectChange {
    direct: Vec<Arc<ProjectDependency>>,
    default_components: BTreeMap<String, String>,
    global_contexts: Vec<GlobalContext>,
    tracked: Vec<Arc<ProjectDependency>>,
    untracked: Vec<String>,
}

/// What a commit did to the tracked set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub tracked: Vec<String>,
    pub untracked: Vec<String>,
    pub indexed_assets: usize,
}

impl ProjectChange {
    pub fn begin(site: &Site) -> Self {
        Self {
            direct: site.project_dependencies.clone(),
            default_components: site.default_components.clone(),
            global_contexts: site.global_contexts.clone(),
            tracked: Vec::new(),
            untracked: Vec::new(),
        }
    }

    /// Direct dependency list as it will be after commit
    pub fn direct_dependencies(&self) -> &[Arc<ProjectDependency>] {
        &self.direct
    }

    pub fn is_direct(&self, pkg_id: &str) -> bool {
        self.direct.iter().any(|d| d.pkg_id == pkg_id)
    }

    /// Append a direct dependency and track it
    pub fn push_direct(&mut self, dep: Arc<ProjectDependency>) {
        self.direct.push(Arc::clone(&dep));
        self.track(dep);
    }

    /// Drop the direct dependency `pkg_id` and untrack it
    pub fn remove_direct(&mut self, pkg_id: &str) -> Option<Arc<ProjectDependency>> {
        let pos = self.direct.iter().position(|d| d.pkg_id == pkg_id)?;
        let removed = self.direct.remove(pos);
        self.untrack(pkg_id);
        Some(removed)
    }

    /// Swap the direct dependency sharing `dep`'s package id for `dep`, keeping its position
    pub fn replace_direct(&mut self, dep: Arc<ProjectDependency>) -> Option<Arc<ProjectDependency>> {
        let slot = self.direct.iter_mut().find(|d| d.pkg_id == dep.pkg_id)?;
        let old = std::mem::replace(slot, Arc::clone(&dep));
        self.untrack(&old.pkg_id);
        self.track(dep);
        Some(old)
    }

    /// Replace the whole direct list without touching tracking
    pub fn set_direct(&mut self, direct: Vec<Arc<ProjectDependency>>) {
        self.direct = direct;
    }

    pub fn track(&mut self, dep: Arc<ProjectDependency>) {
        self.untracked.retain(|id| *id != dep.pkg_id);
        self.tracked.retain(|d| d.pkg_id != dep.pkg_id);
        self.tracked.push(dep);
    }

    pub fn untrack(&mut self, pkg_id: &str) {
        self.tracked.retain(|d| d.pkg_id != pkg_id);
        if !self.untracked.iter().any(|id| id == pkg_id) {
            self.untracked.push(pkg_id.to_string());
        }
    }

    pub fn default_components(&self) -> &BTreeMap<String, String> {
        &self.default_components
    }

    pub fn default_components_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.default_components
    }

    pub fn global_contexts_mut(&mut self) -> &mut Vec<GlobalContext> {
        &mut self.global_contexts
    }

    /// Apply every buffered write
    ///
    /// Untracks run before tracks. Newly tracked dependencies have their
    /// subtrees indexed. Once anything is untracked or replaced the whole index
    /// is rebuilt from the new direct list, so packages shared with a dropped
    /// subtree point at a surviving copy.
    pub fn commit(
        self,
        site: &mut Site,
        store: &mut DependencyGraphStore,
        index: &mut AssetOwnershipIndex,
    ) -> CommitSummary {
        site.project_dependencies = self.direct;
        site.default_components = self.default_components;
        site.global_contexts = self.global_contexts;

        let reindex = !self.untracked.is_empty()
            || self.tracked.iter().any(|dep| store.contains(&dep.pkg_id));

        let mut summary = CommitSummary::default();
        for pkg_id in self.untracked {
            store.untrack(&pkg_id);
            summary.untracked.push(pkg_id);
        }
        for dep in self.tracked {
            if !reindex {
                summary.indexed_assets += index.rebuild_for(&dep);
            }
            summary.tracked.push(dep.pkg_id.clone());
            store.track(dep);
        }
        if reindex {
            summary.indexed_assets = index.rebuild_all(&site.project_dependencies);
        }

        trace!(
            "Committed change: {} tracked, {} untracked",
            summary.tracked.len(),
            summary.untracked.len()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    include!("change.test.rs");
}
