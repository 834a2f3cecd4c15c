//! Integration tests for syncing tracking with an externally edited project
//!
//! Covers the collaborator-edit path: a new direct list arrives without going
//! through import/remove and tracking, ownership and metadata follow it.

use projdeps_lib::DependencyManager;
use projdeps_lib::manager::{HookEvent, RecordingHooks};
use projdeps_lib::model::{AssetKind, AssetRef};
use projdeps_lib::registry::MockRegistryClient;
use projdeps_lib::testing::{host, leaf};
use projdeps_tests::{design_system, marketing_site};
use std::sync::Arc;

fn pkg_ids(deps: &[Arc<projdeps_lib::ProjectDependency>]) -> Vec<&str> {
    deps.iter().map(|dep| dep.pkg_id.as_str()).collect()
}

#[tokio::test]
async fn test_sync_follows_collaborator_edits() {
    let ds = design_system();
    let registry = Arc::new(
        MockRegistryClient::new()
            .with_published(Arc::clone(&ds))
            .with_published(marketing_site("1")),
    );
    let mut manager = DependencyManager::with_hooks(
        host("site", &[Arc::clone(&ds)]),
        registry,
        RecordingHooks::new(),
    );

    // A collaborator added marketing and a fresh copy of ds
    let edited = vec![design_system(), marketing_site("1")];
    let report = manager.sync_direct_deps(edited.clone());

    assert_eq!(pkg_ids(&report.updated), vec!["ds", "marketing"]);
    assert!(report.deleted.is_empty());
    assert!(Arc::ptr_eq(&manager.get_dependency("ds").unwrap().model, &edited[0]));
    assert_eq!(
        manager
            .owner_of(&AssetRef::new(AssetKind::Mixin, "hero"))
            .map(|dep| dep.pkg_id.clone()),
        Some("marketing".to_string())
    );

    // Syncing the same list again is a no-op
    assert!(manager.sync_direct_deps(edited.clone()).is_empty());
    assert_eq!(manager.revision(), 1);

    // ...and dropping ds untracks it
    let report = manager.sync_direct_deps(vec![Arc::clone(&edited[1])]);
    assert!(report.updated.is_empty());
    assert_eq!(pkg_ids(&report.deleted), vec!["ds"]);
    assert!(manager.owner_of(&AssetRef::component("card")).is_none());
    assert_eq!(
        manager.hooks().events(),
        vec![HookEvent::Changed(1), HookEvent::Changed(2)]
    );

    manager.settle_refreshes().await;
    let meta = manager.get_dependency("marketing").unwrap().latest_version_meta.clone();
    assert_eq!(meta.map(|m| m.version), Some("5".to_string()));
}

#[test]
fn test_sync_outside_runtime_skips_refresh() {
    let mut manager = DependencyManager::new(host("site", &[]), Arc::new(MockRegistryClient::new()));

    let report = manager.sync_direct_deps(vec![leaf("a", "1")]);

    assert_eq!(pkg_ids(&report.updated), vec!["a"]);
    assert_eq!(manager.pending_refreshes(), 0);
    assert_eq!(manager.resolved_version("a"), Some("1"));
}
