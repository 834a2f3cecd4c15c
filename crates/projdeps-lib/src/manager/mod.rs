//! # Dependency Manager
//!
//! Façade over the dependency graph of one host project. It validates every
//! mutation before touching anything, applies it through a single
//! [`ProjectChange`], keeps asset ownership indexed and then refreshes
//! publication metadata in the background.
//!
//! ## Modules
//!
//! - [`change`] - Buffered, all-or-nothing project mutations
//! - [`hooks`] - Collaborators notified about mutations
//! - [`refresh`] - Background metadata fetches
//! - [`naming`] - Display names for hostless packages

pub mod change;
pub mod hooks;
pub mod naming;
pub mod refresh;

pub use change::{CommitSummary, ProjectChange};
#[cfg(any(test, feature = "test-utils"))]
pub use hooks::{HookEvent, RecordingHooks};
pub use hooks::{NoopHooks, ProjectHooks};
pub use naming::HostlessCatalog;
pub use refresh::{MetadataRefresher, RefreshOutcome};

use crate::graph::resolver::{build_map, check_compatible, check_cycle};
use crate::graph::traversal::walk_unique;
use crate::graph::{
    AssetOwnershipIndex, DependencyError, DependencyGraph, DependencyGraphStore, DependencyMap,
    DependencyRecord, TransitivePromoter,
};
use crate::model::{AssetRef, HostProject, ProjectDependency, Site};
use crate::registry::RegistryClient;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of [`DependencyManager::sync_direct_deps`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Newly tracked or externally replaced dependencies
    pub updated: Vec<Arc<ProjectDependency>>,
    pub deleted: Vec<Arc<ProjectDependency>>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.deleted.is_empty()
    }
}

pub struct DependencyManager<R: RegistryClient + 'static, H: ProjectHooks = NoopHooks> {
    host: HostProject,
    registry: Arc<R>,
    hooks: H,
    store: DependencyGraphStore,
    index: AssetOwnershipIndex,
    /// Resolved closure of the host, recomputed on every commit
    closure: DependencyMap,
    revision: u64,
    refresher: MetadataRefresher,
    catalog: HostlessCatalog,
}

impl<R: RegistryClient + 'static> DependencyManager<R, NoopHooks> {
    pub fn new(host: HostProject, registry: Arc<R>) -> Self {
        Self::with_hooks(host, registry, NoopHooks)
    }
}

impl<R: RegistryClient + 'static, H: ProjectHooks> DependencyManager<R, H> {
    /// Start managing `host`, tracking the dependencies it already declares
    pub fn with_hooks(host: HostProject, registry: Arc<R>, hooks: H) -> Self {
        let mut store = DependencyGraphStore::new();
        let mut index = AssetOwnershipIndex::new();
        index.rebuild_all(&host.site.project_dependencies);
        for dep in &host.site.project_dependencies {
            store.track(Arc::clone(dep));
        }

        let mut manager = Self {
            host,
            registry,
            hooks,
            store,
            index,
            closure: DependencyMap::new(),
            revision: 0,
            refresher: MetadataRefresher::new(),
            catalog: HostlessCatalog::default(),
        };
        manager.refresh_view();
        debug!(
            "Managing {} with {} direct dependencies",
            manager.host.project_id,
            manager.store.len()
        );
        manager
    }

    pub fn with_catalog(mut self, catalog: HostlessCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn host(&self) -> &HostProject {
        &self.host
    }

    pub fn site(&self) -> &Site {
        &self.host.site
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub fn store(&self) -> &DependencyGraphStore {
        &self.store
    }

    /// Incremented by every committed change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Direct dependencies sorted by name
    pub fn list_dependencies(&self) -> Vec<&DependencyRecord> {
        self.store.list_direct()
    }

    pub fn get_dependency(&self, pkg_id: &str) -> Option<&DependencyRecord> {
        self.store.get(pkg_id)
    }

    /// Whether `pkg_id` is a direct dependency of the host
    pub fn contains_package(&self, pkg_id: &str) -> bool {
        self.host.site.direct_dependency(pkg_id).is_some()
    }

    /// Version of `pkg_id` anywhere in the host's closure
    pub fn resolved_version(&self, pkg_id: &str) -> Option<&str> {
        self.closure.get(pkg_id).map(|dep| dep.version.as_str())
    }

    /// The resolved closure, keyed by package id
    pub fn closure(&self) -> &DependencyMap {
        &self.closure
    }

    /// Dependency owning `asset`, if that dependency is still part of the closure
    pub fn owner_of(&self, asset: &AssetRef) -> Option<Arc<ProjectDependency>> {
        let owner = self.index.owner_of(asset)?;
        let live = self
            .closure
            .get(&owner.pkg_id)
            .is_some_and(|resolved| resolved.version == owner.version);
        live.then_some(owner)
    }

    /// Hostless names of direct dependencies that require `pkg_id`'s hostless package
    pub fn hostless_dependents(&self, pkg_id: &str) -> Vec<String> {
        let Some(info) = self.store.get(pkg_id).and_then(|r| r.model.hostless_info()) else {
            return Vec::new();
        };

        self.store
            .list_direct()
            .into_iter()
            .filter(|record| record.pkg_id() != pkg_id)
            .filter(|record| record.model.requires_hostless(&info.name))
            .filter_map(|record| Some(record.model.hostless_info()?.name.clone()))
            .collect()
    }

    /// Display name of `dep`
    pub fn nice_dep_name<'a>(&'a self, dep: &'a ProjectDependency) -> &'a str {
        self.catalog.display_name(dep)
    }

    /// Package-level graph of the host's closure
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_root(&self.host.site)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Import the latest published version of `project_id` as a direct dependency
    ///
    /// Fails without changing anything if the import is the host itself, is
    /// unpublished, already imported, protected by app auth, would close a
    /// cycle, or disagrees with the host's closure on any package version.
    pub async fn import(&mut self, project_id: &str) -> Result<Arc<ProjectDependency>, DependencyError> {
        self.apply_refreshes();

        if project_id == self.host.project_id {
            return Err(DependencyError::SelfImport);
        }

        let pkg = self
            .registry
            .get_pkg_by_project_id(project_id)
            .await?
            .ok_or_else(|| DependencyError::UnpublishedPackage {
                project_id: project_id.to_string(),
            })?;

        if self.contains_package(&pkg.id) {
            return Err(DependencyError::AlreadyImported {
                project_id: project_id.to_string(),
            });
        }

        if self
            .registry
            .get_app_auth_pub_config(project_id)
            .await?
            .is_auth_enabled
        {
            return Err(DependencyError::AuthUnsupported {
                project_id: project_id.to_string(),
            });
        }

        let host_pkg = self
            .registry
            .get_pkg_by_project_id(&self.host.project_id)
            .await?;
        let candidate = self.registry.get_pkg_version(&pkg.id).await?.model;

        let imported = build_map(&candidate)?;
        check_cycle(host_pkg.as_ref().map(|p| p.id.as_str()), &imported, project_id)?;
        if let Some(cycle) = DependencyGraph::from_root(&candidate).detect_cycle() {
            warn!("{} depends on itself: {}", candidate, cycle.join(" -> "));
            return Err(DependencyError::CircularDependency {
                imported_project_id: project_id.to_string(),
            });
        }

        let local = build_map(&self.host.site).map_err(|e| {
            error!("Host closure is inconsistent: {}", e);
            DependencyError::InvariantViolation {
                reason: e.to_string(),
            }
        })?;
        check_compatible(&local, &imported)?;

        let mut change = ProjectChange::begin(&self.host.site);
        change.push_direct(Arc::clone(&candidate));

        let promoter = TransitivePromoter::new(change.direct_dependencies());
        for dep in promoter.promote(&candidate) {
            if !change.is_direct(&dep.pkg_id) {
                debug!("Promoting {} to a direct dependency", dep);
                change.push_direct(dep);
            }
        }

        let contexts = change.global_contexts_mut();
        for context in &candidate.site.global_contexts {
            if !contexts.iter().any(|c| c.component == context.component) {
                contexts.push(context.clone());
            }
        }

        let defaults = change.default_components_mut();
        for (kind, component) in Self::non_transitive_defaults(&candidate.site) {
            defaults.entry(kind).or_insert(component);
        }

        self.commit(change);
        self.schedule_missing_meta();
        info!("Imported {}", candidate);
        Ok(candidate)
    }

    /// Default components of `site` declared by the site itself or its direct dependencies
    fn non_transitive_defaults(site: &Site) -> Vec<(String, String)> {
        site.default_components
            .iter()
            .filter(|(_, uuid)| {
                site.declares_component(uuid)
                    || site
                        .project_dependencies
                        .iter()
                        .any(|d| d.site.declares_component(uuid))
            })
            .map(|(kind, uuid)| (kind.clone(), uuid.clone()))
            .collect()
    }

    /// Remove the direct dependency `pkg_id`
    ///
    /// Refused while another direct dependency requires it as a hostless package.
    pub async fn remove(&mut self, pkg_id: &str) -> Result<(), DependencyError> {
        self.apply_refreshes();

        let dep = self
            .store
            .get(pkg_id)
            .map(|record| Arc::clone(&record.model))
            .ok_or_else(|| DependencyError::UnknownDependency {
                pkg_id: pkg_id.to_string(),
            })?;

        let blocking_names = self.hostless_dependents(pkg_id);
        if !blocking_names.is_empty() {
            return Err(DependencyError::HostlessDependentsExist {
                pkg_id: pkg_id.to_string(),
                blocking_names,
            });
        }

        let mut change = ProjectChange::begin(&self.host.site);
        change.remove_direct(pkg_id);

        // Defaults pointing into the removed subtree go too, unless still reachable
        let remaining: HashSet<String> = walk_unique(change.direct_dependencies())
            .iter()
            .flat_map(|d| d.site.components.iter().map(|c| c.uuid.clone()))
            .collect();
        let removed: HashSet<String> = walk_unique(&dep)
            .iter()
            .flat_map(|d| d.site.components.iter().map(|c| c.uuid.clone()))
            .filter(|uuid| !remaining.contains(uuid))
            .collect();
        change
            .default_components_mut()
            .retain(|_, uuid| !removed.contains(uuid));

        self.hooks.remove_dependency_references(&dep, &mut change);
        self.commit(change);
        info!("Removed {}", dep);
        Ok(())
    }

    /// Replace direct dependencies with the given versions of the same packages
    ///
    /// The closure of the resulting direct list must resolve without conflicts.
    pub async fn upgrade(&mut self, targets: Vec<Arc<ProjectDependency>>) -> Result<(), DependencyError> {
        self.apply_refreshes();

        let mut change = ProjectChange::begin(&self.host.site);
        let mut replaced = Vec::with_capacity(targets.len());
        for target in &targets {
            let old = change.replace_direct(Arc::clone(target)).ok_or_else(|| {
                DependencyError::UnknownDependency {
                    pkg_id: target.pkg_id.clone(),
                }
            })?;
            replaced.push(old);
        }

        build_map(change.direct_dependencies())?;

        self.commit(change);
        self.schedule_missing_meta();
        for old in &replaced {
            self.hooks.invalidate_site_cache(&old.site.uuid);
        }
        info!("Upgraded {} dependencies", replaced.len());
        Ok(())
    }

    /// Bring tracking in line with an externally changed direct list
    ///
    /// No conflict or cycle checks: `current` is taken as already valid.
    pub fn sync_direct_deps(&mut self, current: Vec<Arc<ProjectDependency>>) -> SyncReport {
        self.apply_refreshes();

        let mut change = ProjectChange::begin(&self.host.site);
        let mut report = SyncReport::default();

        for dep in &current {
            match self.store.get(&dep.pkg_id) {
                None => {
                    change.track(Arc::clone(dep));
                    report.updated.push(Arc::clone(dep));
                }
                Some(record) if !Arc::ptr_eq(&record.model, dep) => {
                    change.untrack(&dep.pkg_id);
                    change.track(Arc::clone(dep));
                    report.updated.push(Arc::clone(dep));
                }
                Some(_) => {}
            }
        }

        let current_ids: HashSet<&str> = current.iter().map(|d| d.pkg_id.as_str()).collect();
        for record in self.store.list_direct() {
            if !current_ids.contains(record.pkg_id()) {
                change.untrack(record.pkg_id());
                report.deleted.push(Arc::clone(&record.model));
            }
        }

        let list_unchanged = current.len() == self.host.site.project_dependencies.len()
            && current
                .iter()
                .zip(&self.host.site.project_dependencies)
                .all(|(a, b)| Arc::ptr_eq(a, b));
        if report.is_empty() && list_unchanged {
            return report;
        }

        change.set_direct(current);
        self.commit(change);
        self.schedule_missing_meta();
        debug!(
            "Synced direct dependencies: {} updated, {} deleted",
            report.updated.len(),
            report.deleted.len()
        );
        report
    }

    /// Make a dependency that is currently only transitive a direct one
    pub fn add_transitive_dep_as_direct_dep(
        &mut self,
        dep: Arc<ProjectDependency>,
    ) -> Result<(), DependencyError> {
        if self.store.contains(&dep.pkg_id) {
            error!("{} is already a direct dependency", dep);
            return Err(DependencyError::InvariantViolation {
                reason: format!("{} is already a direct dependency", dep.pkg_id),
            });
        }

        let mut change = ProjectChange::begin(&self.host.site);
        change.push_direct(dep);
        self.commit(change);
        self.schedule_missing_meta();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Metadata refresh
    // ------------------------------------------------------------------

    /// Apply refresh results that already arrived; returns how many were stored
    pub fn apply_refreshes(&mut self) -> usize {
        let outcomes = self.refresher.drain();
        self.store_outcomes(outcomes)
    }

    /// Wait for in-flight refreshes and apply their results
    pub async fn settle_refreshes(&mut self) -> usize {
        let outcomes = self.refresher.settle().await;
        self.store_outcomes(outcomes)
    }

    /// Re-fetch metadata for every direct dependency and wait for it
    pub async fn refresh_deps(&mut self) -> usize {
        let pkg_ids: Vec<String> = self.store.pkg_ids().map(str::to_string).collect();
        self.refresher.schedule(&self.registry, pkg_ids);
        self.settle_refreshes().await
    }

    pub fn pending_refreshes(&self) -> usize {
        self.refresher.pending()
    }

    fn store_outcomes(&mut self, outcomes: Vec<RefreshOutcome>) -> usize {
        outcomes
            .into_iter()
            .filter_map(|outcome| Some((outcome.pkg_id, outcome.meta?)))
            .filter(|(pkg_id, meta)| self.store.set_version_meta(pkg_id, meta.clone()))
            .count()
    }

    fn schedule_missing_meta(&mut self) {
        let missing: Vec<String> = self
            .store
            .list_direct()
            .into_iter()
            .filter(|record| record.latest_version_meta.is_none())
            .map(|record| record.pkg_id().to_string())
            .collect();
        self.refresher.schedule(&self.registry, missing);
    }

    fn commit(&mut self, change: ProjectChange) {
        let summary = change.commit(&mut self.host.site, &mut self.store, &mut self.index);
        self.revision += 1;
        debug!(
            "Revision {}: tracked {:?}, untracked {:?}, {} assets indexed",
            self.revision, summary.tracked, summary.untracked, summary.indexed_assets
        );
        self.refresh_view();
        self.hooks.on_dependencies_changed(self.revision);
    }

    fn refresh_view(&mut self) {
        self.closure = match build_map(&self.host.site) {
            Ok(map) => map,
            Err(e) => {
                error!("Dependency closure is inconsistent: {}", e);
                walk_unique(&self.host.site)
                    .into_iter()
                    .map(|dep| (dep.pkg_id.clone(), dep))
                    .collect()
            }
        };
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
