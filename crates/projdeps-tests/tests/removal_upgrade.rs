//! Integration tests for removing and upgrading direct dependencies
//!
//! Uses the in-memory registry and recording hooks to observe:
//! - Hostless removal guard
//! - Cleanup of defaults and ownership after removal
//! - Ownership of packages shared between direct dependencies
//! - Site invalidation on upgrade

use anyhow::Result;
use projdeps_lib::DependencyManager;
use projdeps_lib::graph::DependencyError;
use projdeps_lib::manager::{HookEvent, RecordingHooks};
use projdeps_lib::model::{AssetKind, AssetRef, Site};
use projdeps_lib::registry::MockRegistryClient;
use projdeps_lib::testing::{dep_with_site, host, leaf};
use projdeps_tests::{design_system, hostless_pair, marketing_site};
use std::sync::Arc;

fn registry() -> Arc<MockRegistryClient> {
    Arc::new(MockRegistryClient::new().with_published(design_system()))
}

#[tokio::test]
async fn test_hostless_requirement_blocks_removal_until_dependent_is_gone() -> Result<()> {
    let (jquery, slick) = hostless_pair();
    let mut manager = DependencyManager::with_hooks(
        host("site", &[jquery, slick]),
        registry(),
        RecordingHooks::new(),
    );

    let err = manager.remove("jquery").await.unwrap_err();
    assert!(err.to_string().contains("slick"));
    assert_eq!(manager.hostless_dependents("jquery"), vec!["slick"]);
    assert!(manager.hooks().events().is_empty());

    manager.remove("slick").await?;
    assert!(manager.hostless_dependents("jquery").is_empty());
    manager.remove("jquery").await?;

    assert!(manager.list_dependencies().is_empty());
    assert_eq!(
        manager.hooks().events(),
        vec![
            HookEvent::ReferencesRemoved("slick".to_string()),
            HookEvent::Changed(1),
            HookEvent::ReferencesRemoved("jquery".to_string()),
            HookEvent::Changed(2),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_removing_design_system_keeps_promoted_dependency() -> Result<()> {
    let mut manager =
        DependencyManager::with_hooks(host("site", &[]), registry(), RecordingHooks::new());
    manager.import("proj-ds").await?;

    manager.remove("ds").await?;

    // icons was promoted and stays; tokens was only reachable through ds
    let ids: Vec<&str> = manager.list_dependencies().iter().map(|r| r.pkg_id()).collect();
    assert_eq!(ids, vec!["icons"]);
    assert!(manager.owner_of(&AssetRef::component("icon")).is_some());
    assert!(manager.owner_of(&AssetRef::component("card")).is_none());
    assert!(
        manager
            .owner_of(&AssetRef::new(AssetKind::StyleToken, "brand"))
            .is_none()
    );
    assert!(manager.resolved_version("tokens").is_none());
    assert!(!manager.site().default_components.contains_key("button"));

    assert_eq!(
        manager.hooks().events(),
        vec![
            HookEvent::Changed(1),
            HookEvent::ReferencesRemoved("ds".to_string()),
            HookEvent::Changed(2),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_upgrade_invalidates_replaced_site() -> Result<()> {
    let mut manager = DependencyManager::with_hooks(
        host("site", &[marketing_site("1")]),
        registry(),
        RecordingHooks::new(),
    );

    let next = dep_with_site(
        "marketing",
        "6",
        Site::new("site-marketing-6")
            .with_mixin("hero", "Hero")
            .with_mixin("footer", "Footer")
            .with_dependency(leaf("tokens", "1")),
    );
    manager.upgrade(vec![next]).await?;

    assert_eq!(manager.resolved_version("marketing"), Some("6"));
    assert_eq!(
        manager
            .owner_of(&AssetRef::new(AssetKind::Mixin, "footer"))
            .map(|dep| dep.version.clone()),
        Some("6".to_string())
    );
    assert_eq!(
        manager.hooks().events(),
        vec![
            HookEvent::Changed(1),
            HookEvent::SiteInvalidated("site-marketing".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_upgrade_into_conflict_is_rejected_whole() -> Result<()> {
    let mut manager =
        DependencyManager::with_hooks(host("site", &[]), registry(), RecordingHooks::new());
    manager.import("proj-ds").await?;
    manager.add_transitive_dep_as_direct_dep(marketing_site("1"))?;
    let before = manager.site().clone();

    // marketing@6 moves tokens to 2 while ds still needs 1
    let next = dep_with_site(
        "marketing",
        "6",
        Site::new("site-marketing-6").with_dependency(leaf("tokens", "2")),
    );
    let result = manager.upgrade(vec![next]).await;

    assert!(matches!(
        result,
        Err(DependencyError::VersionConflict { ref pkg_id, .. }) if pkg_id == "tokens"
    ));
    assert_eq!(manager.site(), &before);
    assert_eq!(manager.resolved_version("marketing"), Some("5"));
    assert!(
        !manager
            .hooks()
            .events()
            .iter()
            .any(|event| matches!(event, HookEvent::SiteInvalidated(_)))
    );
    Ok(())
}

#[tokio::test]
async fn test_shared_package_keeps_owner_after_removal_and_upgrade() -> Result<()> {
    // ds and marketing each carry their own copy of tokens@1
    let registry = Arc::new(
        MockRegistryClient::new()
            .with_published(design_system())
            .with_published(marketing_site("1")),
    );
    let brand = AssetRef::new(AssetKind::StyleToken, "brand");
    let brand_owner = |manager: &DependencyManager<MockRegistryClient, RecordingHooks>| {
        manager.owner_of(&brand).map(|dep| dep.pkg_id.clone())
    };

    let mut manager =
        DependencyManager::with_hooks(host("site", &[]), registry, RecordingHooks::new());
    manager.import("proj-ds").await?;
    manager.import("proj-marketing").await?;
    assert_eq!(brand_owner(&manager).as_deref(), Some("tokens"));

    manager.upgrade(vec![leaf("marketing", "6")]).await?;
    assert_eq!(manager.resolved_version("tokens"), Some("1"));
    assert_eq!(brand_owner(&manager).as_deref(), Some("tokens"));

    manager.remove("marketing").await?;
    assert_eq!(brand_owner(&manager).as_deref(), Some("tokens"));
    Ok(())
}
