//! Integration tests for importing packages through the HTTP registry
//!
//! Every test runs the dependency manager against a local mockito registry:
//! - Promotion of default-slot dependencies
//! - Asset ownership after import
//! - Rejections leave the host untouched

use anyhow::Result;
use projdeps_lib::DependencyManager;
use projdeps_lib::graph::DependencyError;
use projdeps_lib::model::{AssetKind, AssetRef};
use projdeps_lib::registry::{Pkg, RegistryError, VersionMeta};
use projdeps_lib::testing::host;
use projdeps_tests::{RegistryServer, design_system, marketing_site};

fn direct_ids<R: projdeps_lib::RegistryClient + 'static>(manager: &DependencyManager<R>) -> Vec<String> {
    manager
        .list_dependencies()
        .iter()
        .map(|record| record.pkg_id().to_string())
        .collect()
}

#[tokio::test]
async fn test_import_design_system_promotes_slot_dependency() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.unpublished("site").await;
    server.publish(&design_system()).await?;

    let mut manager = DependencyManager::new(host("site", &[]), server.client()?);
    let imported = manager.import("proj-ds").await?;

    assert_eq!(imported.version, "2");
    // icons renders inside Card's default slot, tokens is only transitive
    assert_eq!(direct_ids(&manager), vec!["ds", "icons"]);
    assert_eq!(manager.resolved_version("tokens"), Some("1"));

    let owner = |asset: AssetRef| manager.owner_of(&asset).map(|dep| dep.pkg_id.clone());
    assert_eq!(owner(AssetRef::component("card")), Some("ds".to_string()));
    assert_eq!(owner(AssetRef::component("icon")), Some("icons".to_string()));
    assert_eq!(
        owner(AssetRef::new(AssetKind::StyleToken, "brand")),
        Some("tokens".to_string())
    );
    assert_eq!(
        owner(AssetRef::new(AssetKind::ImageAsset, "icon-sprite")),
        Some("icons".to_string())
    );
    assert_eq!(owner(AssetRef::component("unknown")), None);

    assert_eq!(
        manager.site().default_components.get("button").map(String::as_str),
        Some("button")
    );
    assert_eq!(manager.site().global_contexts.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_import_fetches_metadata_in_background() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.unpublished("site").await;
    server
        .publish_with_meta(
            &design_system(),
            VersionMeta {
                pkg_id: "ds".to_string(),
                version: "3".to_string(),
                description: Some("Next major".to_string()),
                published_at: None,
                tags: vec!["latest".to_string()],
            },
        )
        .await?;

    let mut manager = DependencyManager::new(host("site", &[]), server.client()?);
    manager.import("proj-ds").await?;
    manager.settle_refreshes().await;

    let record = manager.get_dependency("ds").expect("ds is tracked");
    assert!(record.has_update());
    // icons has no metadata endpoint; its refresh fails quietly
    assert!(manager.get_dependency("icons").expect("icons is tracked").latest_version_meta.is_none());
    Ok(())
}

#[tokio::test]
async fn test_import_conflicting_with_host_closure_changes_nothing() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.unpublished("site").await;
    server.publish(&design_system()).await?;

    let mut manager = DependencyManager::new(host("site", &[marketing_site("2")]), server.client()?);
    let before = manager.site().clone();

    match manager.import("proj-ds").await {
        Err(DependencyError::VersionConflict {
            pkg_id,
            version_a,
            version_b,
            ..
        }) => {
            assert_eq!(pkg_id, "tokens");
            assert_eq!(version_a, "2");
            assert_eq!(version_b, "1");
        }
        other => panic!("expected a version conflict, got {:?}", other),
    }

    assert_eq!(manager.site(), &before);
    assert_eq!(manager.revision(), 0);
    Ok(())
}

#[tokio::test]
async fn test_import_of_compatible_site_shares_closure() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.unpublished("site").await;
    server.publish(&design_system()).await?;
    server.publish(&marketing_site("1")).await?;

    let mut manager = DependencyManager::new(host("site", &[]), server.client()?);
    manager.import("proj-ds").await?;
    manager.import("proj-marketing").await?;

    assert_eq!(direct_ids(&manager), vec!["ds", "icons", "marketing"]);
    assert_eq!(manager.resolved_version("tokens"), Some("1"));
    assert_eq!(manager.revision(), 2);

    assert!(matches!(
        manager.import("proj-marketing").await,
        Err(DependencyError::AlreadyImported { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_protected_and_unpublished_projects_are_rejected() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.unpublished("proj-draft").await;
    server
        .protect(&Pkg {
            id: "admin".to_string(),
            project_id: "proj-admin".to_string(),
            name: "Admin".to_string(),
        })
        .await;

    let mut manager = DependencyManager::new(host("site", &[]), server.client()?);

    assert!(matches!(
        manager.import("proj-draft").await,
        Err(DependencyError::UnpublishedPackage { .. })
    ));
    assert!(matches!(
        manager.import("proj-admin").await,
        Err(DependencyError::AuthUnsupported { .. })
    ));
    assert!(manager.list_dependencies().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_registry_errors_surface_unchanged() -> Result<()> {
    let server = RegistryServer::start().await;
    let mut manager = DependencyManager::new(host("site", &[]), server.client()?);

    match manager.import("proj-nowhere").await {
        Err(DependencyError::Registry {
            source: RegistryError::Status { status, .. },
        }) => assert_eq!(status, 501),
        other => panic!("expected a registry status error, got {:?}", other),
    }
    Ok(())
}
