//! Asset to owning-dependency index
//!
//! Entries hold [`Weak`] references: the dependency tree owns the assets, the
//! index only points back at it. Entries go away only on a full
//! [`AssetOwnershipIndex::rebuild_all`]. Until then a dropped dependency's
//! entries stop upgrading, and callers must check a live owner against the
//! tracked closure themselves.

use super::traversal::walk_unique;
use crate::model::{AssetRef, ProjectDependency};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::trace;

#[derive(Debug, Default)]
pub struct AssetOwnershipIndex {
    owners: HashMap<AssetRef, Weak<ProjectDependency>>,
}

impl AssetOwnershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point every asset of `dep` and its descendants at the dependency declaring it
    ///
    /// `dep` is written first, then its descendants breadth-first, each
    /// overwriting earlier owners. Returns the number of entries written.
    pub fn rebuild_for(&mut self, dep: &Arc<ProjectDependency>) -> usize {
        let mut written = 0;
        for owner in walk_unique(dep) {
            let weak = Arc::downgrade(&owner);
            for asset in owner.site.importable_assets() {
                self.owners.insert(asset, weak.clone());
                written += 1;
            }
        }
        trace!("Indexed {} assets under {}", written, dep);
        written
    }

    /// Clear the index and rebuild it from `direct`, in order
    ///
    /// A package shared by several subtrees ends up pointing at the copy under
    /// the last direct dependency reaching it, which stays alive as long as that
    /// dependency does.
    pub fn rebuild_all(&mut self, direct: &[Arc<ProjectDependency>]) -> usize {
        self.owners.clear();
        direct.iter().map(|dep| self.rebuild_for(dep)).sum()
    }

    /// The dependency owning `asset`, if it is still alive
    pub fn owner_of(&self, asset: &AssetRef) -> Option<Arc<ProjectDependency>> {
        self.owners.get(asset).and_then(Weak::upgrade)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    include!("ownership.test.rs");
}
