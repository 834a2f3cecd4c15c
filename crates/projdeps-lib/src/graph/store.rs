//! Tracked direct dependencies

use crate::model::ProjectDependency;
use crate::registry::VersionMeta;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// A tracked direct dependency and the publication metadata fetched for it
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRecord {
    pub model: Arc<ProjectDependency>,
    pub latest_version_meta: Option<VersionMeta>,
}

impl DependencyRecord {
    pub fn new(model: Arc<ProjectDependency>) -> Self {
        Self {
            model,
            latest_version_meta: None,
        }
    }

    pub fn pkg_id(&self) -> &str {
        &self.model.pkg_id
    }

    /// Whether a newer version than the tracked one has been published
    pub fn has_update(&self) -> bool {
        self.latest_version_meta
            .as_ref()
            .is_some_and(|meta| meta.version != self.model.version)
    }
}

/// Direct dependencies keyed by package id
///
/// Performs no validation; callers resolve conflicts and cycles first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DependencyGraphStore {
    records: HashMap<String, DependencyRecord>,
}

impl DependencyGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `dep`, replacing any record with the same package id
    pub fn track(&mut self, dep: Arc<ProjectDependency>) {
        trace!("Tracking {}", dep);
        self.records
            .insert(dep.pkg_id.clone(), DependencyRecord::new(dep));
    }

    pub fn untrack(&mut self, pkg_id: &str) -> Option<DependencyRecord> {
        trace!("Untracking {}", pkg_id);
        self.records.remove(pkg_id)
    }

    pub fn get(&self, pkg_id: &str) -> Option<&DependencyRecord> {
        self.records.get(pkg_id)
    }

    pub fn contains(&self, pkg_id: &str) -> bool {
        self.records.contains_key(pkg_id)
    }

    /// Records sorted by dependency name (package id breaks ties)
    pub fn list_direct(&self) -> Vec<&DependencyRecord> {
        let mut records: Vec<&DependencyRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            a.model
                .name
                .cmp(&b.model.name)
                .then_with(|| a.model.pkg_id.cmp(&b.model.pkg_id))
        });
        records
    }

    pub fn pkg_ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Attach fetched metadata; a no-op returning false when `pkg_id` is not tracked
    pub fn set_version_meta(&mut self, pkg_id: &str, meta: VersionMeta) -> bool {
        match self.records.get_mut(pkg_id) {
            Some(record) => {
                record.latest_version_meta = Some(meta);
                true
            }
            None => {
                trace!("Dropping metadata for untracked package {}", pkg_id);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    include!("store.test.rs");
}
