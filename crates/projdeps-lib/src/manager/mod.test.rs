// Tests for the dependency manager façade

use super::*;
use crate::model::{Component, TplNode};
use crate::registry::{MockRegistryClient, Pkg};
use crate::testing::{dep, dep_with_site, host, hostless_dep, leaf};

// ============================================================================
// Test Utilities
// ============================================================================

fn host_pkg() -> Pkg {
    Pkg {
        id: "host-pkg".to_string(),
        project_id: "host".to_string(),
        name: "Host".to_string(),
    }
}

fn registry_with(published: &[Arc<ProjectDependency>]) -> Arc<MockRegistryClient> {
    let registry = published.iter().fold(
        MockRegistryClient::new().with_pkg("host", host_pkg()),
        |registry, dep| registry.with_published(Arc::clone(dep)),
    );
    Arc::new(registry)
}

fn manager_for(
    direct: &[Arc<ProjectDependency>],
    published: &[Arc<ProjectDependency>],
) -> DependencyManager<MockRegistryClient, RecordingHooks> {
    DependencyManager::with_hooks(host("host", direct), registry_with(published), RecordingHooks::new())
}

fn direct_ids<H: ProjectHooks>(manager: &DependencyManager<MockRegistryClient, H>) -> Vec<String> {
    manager
        .list_dependencies()
        .iter()
        .map(|r| r.pkg_id().to_string())
        .collect()
}

// ============================================================================
// Import
// ============================================================================

#[tokio::test]
async fn test_import_into_empty_host() {
    let b = dep_with_site(
        "b",
        "1.0",
        Site::new("site-b")
            .with_component(Component::new("b-button", "Button"))
            .with_style_token("b-red", "red", "#f00"),
    );
    let mut manager = manager_for(&[], &[Arc::clone(&b)]);

    let imported = manager.import("proj-b").await.unwrap();

    assert!(Arc::ptr_eq(&imported, &b));
    assert_eq!(direct_ids(&manager), vec!["b"]);
    assert!(manager.contains_package("b"));
    for asset in b.site.importable_assets() {
        assert_eq!(manager.owner_of(&asset).unwrap().pkg_id, "b");
    }
    assert_eq!(manager.revision(), 1);
    assert_eq!(manager.hooks().events(), vec![HookEvent::Changed(1)]);

    assert_eq!(manager.settle_refreshes().await, 1);
    let meta = manager.get_dependency("b").unwrap().latest_version_meta.clone();
    assert_eq!(meta.map(|m| m.version), Some("1.0".to_string()));
}

#[tokio::test]
async fn test_self_import_is_rejected_before_any_fetch() {
    let mut manager = manager_for(&[], &[]);

    assert!(matches!(
        manager.import("host").await,
        Err(DependencyError::SelfImport)
    ));
    assert!(manager.registry().calls().await.is_empty());
}

#[tokio::test]
async fn test_unpublished_project() {
    let mut manager = manager_for(&[], &[]);
    let err = manager.import("proj-ghost").await.unwrap_err();
    assert!(matches!(err, DependencyError::UnpublishedPackage { ref project_id } if project_id == "proj-ghost"));
}

#[tokio::test]
async fn test_already_imported() {
    let a = leaf("a", "1");
    let mut manager = manager_for(&[Arc::clone(&a)], &[a]);

    assert!(matches!(
        manager.import("proj-a").await,
        Err(DependencyError::AlreadyImported { .. })
    ));
}

#[tokio::test]
async fn test_auth_enabled_project_is_rejected() {
    let locked = leaf("locked", "1");
    let registry = Arc::new(
        MockRegistryClient::new()
            .with_published(locked)
            .with_auth_enabled("proj-locked"),
    );
    let mut manager = DependencyManager::new(host("host", &[]), registry);

    assert!(matches!(
        manager.import("proj-locked").await,
        Err(DependencyError::AuthUnsupported { .. })
    ));
    assert!(manager.list_dependencies().is_empty());
}

#[tokio::test]
async fn test_cycle_through_host_package_changes_nothing() {
    let existing = leaf("a", "1");
    let cyclic = dep("c", "1", &[dep("mid", "1", &[leaf("host-pkg", "4")])]);
    let mut manager = manager_for(&[existing], &[Arc::clone(&cyclic)]);
    let store_before = manager.store().clone();
    let site_before = manager.site().clone();

    let err = manager.import("proj-c").await.unwrap_err();

    assert!(matches!(
        err,
        DependencyError::CircularDependency { ref imported_project_id } if imported_project_id == "proj-c"
    ));
    assert_eq!(manager.store(), &store_before);
    assert_eq!(manager.site(), &site_before);
    assert_eq!(manager.revision(), 0);
}

#[tokio::test]
async fn test_self_referencing_tree_is_a_cycle() {
    let inner_x = leaf("x", "1");
    let x = dep("x", "1", &[dep("y", "1", &[inner_x])]);
    let mut manager = manager_for(&[], &[x]);

    assert!(matches!(
        manager.import("proj-x").await,
        Err(DependencyError::CircularDependency { .. })
    ));
    assert!(manager.list_dependencies().is_empty());
}

#[tokio::test]
async fn test_version_conflict_names_both_versions() {
    let a1 = leaf("a", "1.0");
    let c = dep("c", "1", &[leaf("a", "2.0")]);
    let mut manager = manager_for(&[a1], &[c]);
    let store_before = manager.store().clone();

    match manager.import("proj-c").await {
        Err(DependencyError::VersionConflict {
            pkg_id,
            version_a,
            version_b,
            ..
        }) => {
            assert_eq!(pkg_id, "a");
            assert_eq!(version_a, "1.0");
            assert_eq!(version_b, "2.0");
        }
        other => panic!("expected version conflict, got {:?}", other),
    }
    assert_eq!(manager.store(), &store_before);
    assert_eq!(direct_ids(&manager), vec!["a"]);
}

#[tokio::test]
async fn test_registry_failure_aborts_import() {
    let b = leaf("b", "1");
    let registry = Arc::new(
        MockRegistryClient::new()
            .with_published(b)
            .with_failure("host"),
    );
    let mut manager = DependencyManager::new(host("host", &[]), registry);

    assert!(matches!(
        manager.import("proj-b").await,
        Err(DependencyError::Registry { .. })
    ));
    assert!(manager.list_dependencies().is_empty());
}

#[tokio::test]
async fn test_default_slot_dependency_is_promoted() {
    let e = dep_with_site(
        "e",
        "1",
        Site::new("site-e").with_component(Component::new("y", "Y")),
    );
    let d = dep_with_site(
        "d",
        "1",
        Site::new("site-d")
            .with_component(
                Component::new("x", "X").with_slot("children", vec![TplNode::instance("y")]),
            )
            .with_dependency(Arc::clone(&e)),
    );
    let mut manager = manager_for(&[], &[d]);

    manager.import("proj-d").await.unwrap();

    assert_eq!(direct_ids(&manager), vec!["d", "e"]);
    assert!(Arc::ptr_eq(
        &manager.owner_of(&AssetRef::component("y")).unwrap(),
        &e
    ));
}

#[tokio::test]
async fn test_transitive_hostless_package_is_promoted() {
    let jquery = hostless_dep("jquery", "3", "jquery", &[]);
    let slick = dep_with_site(
        "slick",
        "1",
        Site::new("site-slick")
            .with_hostless("slick", &["jquery"])
            .with_dependency(jquery),
    );
    let mut manager = manager_for(&[], &[slick]);

    manager.import("proj-slick").await.unwrap();
    assert_eq!(direct_ids(&manager), vec!["jquery", "slick"]);
}

#[tokio::test]
async fn test_default_components_merge_skips_transitive_and_keeps_host() {
    let t = dep_with_site(
        "t",
        "1",
        Site::new("site-t").with_component(Component::new("t-select", "Select")),
    );
    let m = dep_with_site(
        "m",
        "1",
        Site::new("site-m")
            .with_component(Component::new("m-input", "Input"))
            .with_dependency(t),
    );
    let c = dep_with_site(
        "c",
        "1",
        Site::new("site-c")
            .with_component(Component::new("c-button", "Button"))
            .with_dependency(m)
            .with_default_component("button", "c-button")
            .with_default_component("input", "m-input")
            .with_default_component("select", "t-select"),
    );
    let mut project = host("host", &[]);
    project.site = project.site.with_default_component("button", "host-button");
    let mut manager = DependencyManager::new(project, registry_with(&[c]));

    manager.import("proj-c").await.unwrap();

    let defaults = &manager.site().default_components;
    assert_eq!(defaults.get("button").map(String::as_str), Some("host-button"));
    assert_eq!(defaults.get("input").map(String::as_str), Some("m-input"));
    assert!(!defaults.contains_key("select"));
}

#[tokio::test]
async fn test_global_contexts_merge_only_missing() {
    let c = dep_with_site(
        "c",
        "1",
        Site::new("site-c")
            .with_global_context("ctx-auth", "AuthProvider")
            .with_global_context("ctx-data", "DataProvider"),
    );
    let mut project = host("host", &[]);
    project.site = project.site.with_global_context("host-auth", "AuthProvider");
    let mut manager = DependencyManager::new(project, registry_with(&[c]));

    manager.import("proj-c").await.unwrap();

    let uuids: Vec<&str> = manager
        .site()
        .global_contexts
        .iter()
        .map(|c| c.uuid.as_str())
        .collect();
    assert_eq!(uuids, vec!["host-auth", "ctx-data"]);
}

// ============================================================================
// Remove
// ============================================================================

#[tokio::test]
async fn test_remove_blocked_by_hostless_dependent() {
    let jquery = hostless_dep("jquery", "3", "jquery", &[]);
    let slick = hostless_dep("slick", "1", "slick", &["jquery"]);
    let mut manager = manager_for(&[jquery, slick], &[]);

    match manager.remove("jquery").await {
        Err(DependencyError::HostlessDependentsExist { blocking_names, .. }) => {
            assert_eq!(blocking_names, vec!["slick"]);
        }
        other => panic!("expected hostless dependents, got {:?}", other),
    }
    assert!(manager.get_dependency("jquery").is_some());

    manager.remove("slick").await.unwrap();
    manager.remove("jquery").await.unwrap();
    assert!(manager.list_dependencies().is_empty());
}

#[tokio::test]
async fn test_remove_unknown_dependency() {
    let mut manager = manager_for(&[], &[]);
    assert!(matches!(
        manager.remove("ghost").await,
        Err(DependencyError::UnknownDependency { .. })
    ));
}

#[tokio::test]
async fn test_remove_cleans_defaults_and_notifies_hooks() {
    let b = dep_with_site(
        "b",
        "1",
        Site::new("site-b").with_component(Component::new("b-button", "Button")),
    );
    let mut project = host("host", &[b]);
    project.site = project
        .site
        .with_default_component("button", "b-button")
        .with_default_component("text", "host-text");
    let mut manager = DependencyManager::with_hooks(project, registry_with(&[]), RecordingHooks::new());

    manager.remove("b").await.unwrap();

    assert!(!manager.contains_package("b"));
    assert!(manager.owner_of(&AssetRef::component("b-button")).is_none());
    let defaults: Vec<&str> = manager.site().default_components.keys().map(String::as_str).collect();
    assert_eq!(defaults, vec!["text"]);
    assert_eq!(
        manager.hooks().events(),
        vec![HookEvent::ReferencesRemoved("b".to_string()), HookEvent::Changed(1)]
    );
}

// ============================================================================
// Upgrade
// ============================================================================

#[tokio::test]
async fn test_upgrade_replaces_and_invalidates_old_site() {
    let a1 = leaf("a", "1");
    let mut manager = manager_for(&[a1, leaf("b", "1")], &[]);

    manager.upgrade(vec![leaf("a", "2")]).await.unwrap();

    assert_eq!(manager.get_dependency("a").unwrap().model.version, "2");
    assert_eq!(manager.resolved_version("a"), Some("2"));
    assert_eq!(
        manager.hooks().events(),
        vec![
            HookEvent::Changed(1),
            HookEvent::SiteInvalidated("site-a-1".to_string())
        ]
    );
}

#[tokio::test]
async fn test_upgrade_conflict_changes_nothing() {
    let a = dep("a", "1", &[leaf("shared", "1")]);
    let b = dep("b", "1", &[leaf("shared", "1")]);
    let mut manager = manager_for(&[a, b], &[]);
    let store_before = manager.store().clone();

    let upgraded_b = dep("b", "2", &[leaf("shared", "2")]);
    assert!(matches!(
        manager.upgrade(vec![upgraded_b]).await,
        Err(DependencyError::VersionConflict { .. })
    ));
    assert_eq!(manager.store(), &store_before);
    assert_eq!(manager.resolved_version("shared"), Some("1"));
}

#[tokio::test]
async fn test_upgrade_of_unknown_package() {
    let mut manager = manager_for(&[leaf("a", "1")], &[]);
    assert!(matches!(
        manager.upgrade(vec![leaf("zzz", "2")]).await,
        Err(DependencyError::UnknownDependency { ref pkg_id }) if pkg_id == "zzz"
    ));
}

// ============================================================================
// Sync
// ============================================================================

#[test]
fn test_sync_tracks_replaces_and_deletes() {
    let a = leaf("a", "1");
    let b = leaf("b", "1");
    let mut manager = manager_for(&[Arc::clone(&a), b], &[]);

    let replaced_a = leaf("a", "1");
    let c = leaf("c", "1");
    let report = manager.sync_direct_deps(vec![Arc::clone(&replaced_a), Arc::clone(&c)]);

    let updated: Vec<&str> = report.updated.iter().map(|d| d.pkg_id.as_str()).collect();
    let deleted: Vec<&str> = report.deleted.iter().map(|d| d.pkg_id.as_str()).collect();
    assert_eq!(updated, vec!["a", "c"]);
    assert_eq!(deleted, vec!["b"]);
    assert!(Arc::ptr_eq(&manager.get_dependency("a").unwrap().model, &replaced_a));
    assert_eq!(direct_ids(&manager), vec!["a", "c"]);
}

#[test]
fn test_sync_is_idempotent() {
    let mut manager = manager_for(&[leaf("a", "1")], &[]);
    let current = vec![leaf("a", "2"), leaf("b", "1")];

    assert!(!manager.sync_direct_deps(current.clone()).is_empty());
    let revision = manager.revision();

    assert!(manager.sync_direct_deps(current).is_empty());
    assert_eq!(manager.revision(), revision);
}

// ============================================================================
// Shared transitive packages
// ============================================================================

/// A fresh copy of `c@1`, as a registry hands out one per parent
fn shared_c() -> Arc<ProjectDependency> {
    dep_with_site(
        "c",
        "1",
        Site::new("site-c").with_component(Component::new("c-card", "Card")),
    )
}

fn card_owner<H: ProjectHooks>(manager: &DependencyManager<MockRegistryClient, H>) -> Option<String> {
    manager
        .owner_of(&AssetRef::component("c-card"))
        .map(|owner| owner.pkg_id.clone())
}

fn diamond_manager() -> DependencyManager<MockRegistryClient, RecordingHooks> {
    manager_for(&[dep("a", "1", &[shared_c()]), dep("r", "1", &[shared_c()])], &[])
}

#[tokio::test]
async fn test_import_sharing_a_package_keeps_owner() {
    let r = dep("r", "1", &[shared_c()]);
    let mut manager = manager_for(&[dep("a", "1", &[shared_c()])], &[r]);

    manager.import("proj-r").await.unwrap();

    assert_eq!(card_owner(&manager).as_deref(), Some("c"));
}

#[tokio::test]
async fn test_remove_keeps_owner_of_package_still_reachable() {
    let mut manager = diamond_manager();

    manager.remove("r").await.unwrap();

    assert_eq!(manager.resolved_version("c"), Some("1"));
    assert_eq!(card_owner(&manager).as_deref(), Some("c"));
}

#[tokio::test]
async fn test_upgrade_keeps_owner_of_package_still_reachable() {
    let mut manager = diamond_manager();

    manager.upgrade(vec![leaf("r", "2")]).await.unwrap();

    assert_eq!(manager.resolved_version("c"), Some("1"));
    assert_eq!(card_owner(&manager).as_deref(), Some("c"));
}

#[test]
fn test_sync_delete_keeps_owner_of_package_still_reachable() {
    let a = dep("a", "1", &[shared_c()]);
    let mut manager = manager_for(&[Arc::clone(&a), dep("r", "1", &[shared_c()])], &[]);

    let report = manager.sync_direct_deps(vec![a]);

    assert_eq!(report.deleted.len(), 1);
    assert_eq!(card_owner(&manager).as_deref(), Some("c"));
}

#[tokio::test]
async fn test_removing_last_path_drops_owner() {
    let mut manager = diamond_manager();

    manager.remove("r").await.unwrap();
    manager.remove("a").await.unwrap();

    assert_eq!(manager.resolved_version("c"), None);
    assert_eq!(card_owner(&manager), None);
}

// ============================================================================
// Supplementary operations
// ============================================================================

#[test]
fn test_add_transitive_dep_as_direct_dep() {
    let shared = leaf("shared", "1");
    let a = dep("a", "1", &[Arc::clone(&shared)]);
    let mut manager = manager_for(&[a], &[]);

    manager.add_transitive_dep_as_direct_dep(shared).unwrap();
    assert_eq!(direct_ids(&manager), vec!["a", "shared"]);

    assert!(matches!(
        manager.add_transitive_dep_as_direct_dep(leaf("shared", "1")),
        Err(DependencyError::InvariantViolation { .. })
    ));
}

#[test]
fn test_resolved_version_covers_transitive_packages() {
    let manager = manager_for(&[dep("a", "1", &[leaf("deep", "7")])], &[]);
    assert_eq!(manager.resolved_version("deep"), Some("7"));
    assert!(!manager.contains_package("deep"));
    assert_eq!(manager.resolved_version("missing"), None);
}

#[tokio::test]
async fn test_refresh_deps_skips_failures() {
    let a = leaf("a", "1");
    let registry = Arc::new(
        MockRegistryClient::new()
            .with_published(Arc::clone(&a))
            .with_failure("b"),
    );
    let mut manager = DependencyManager::new(host("host", &[a, leaf("b", "1")]), registry);

    assert_eq!(manager.refresh_deps().await, 1);
    assert!(manager.get_dependency("a").unwrap().latest_version_meta.is_some());
    assert!(manager.get_dependency("b").unwrap().latest_version_meta.is_none());
}

#[tokio::test]
async fn test_refresh_for_removed_dependency_is_dropped() {
    let b = leaf("b", "1");
    let mut manager = manager_for(&[], &[b]);

    manager.import("proj-b").await.unwrap();
    manager.remove("b").await.unwrap();

    assert_eq!(manager.settle_refreshes().await, 0);
    assert!(manager.get_dependency("b").is_none());
}

#[test]
fn test_nice_dep_name_uses_catalog() {
    let catalog = HostlessCatalog::from_toml_str(
        r#"
        [[hostless]]
        name = "Slick Carousel"
        project_id = "proj-slick"
        "#,
    )
    .unwrap();
    let slick = leaf("slick", "1");
    let other = leaf("other", "1");
    let manager = manager_for(&[Arc::clone(&slick), Arc::clone(&other)], &[]).with_catalog(catalog);

    assert_eq!(manager.nice_dep_name(&slick), "Slick Carousel");
    assert_eq!(manager.nice_dep_name(&other), "other");
}
