use super::*;
use crate::manager::naming::{HostlessComponent, HostlessProjectId};
use crate::registry::{MockRegistryClient, VersionMeta};
use crate::testing::{dep, leaf};

async fn run(registry: MockRegistryClient, catalog: &HostlessCatalog, command: Commands) -> Result<String> {
    let mut out = Vec::new();
    execute_command_with_registry(command, Arc::new(registry), catalog, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

fn diamond_app() -> Arc<ProjectDependency> {
    let c = leaf("c", "2");
    dep(
        "app",
        "1.0",
        &[dep("b", "1", &[c.clone()]), dep("a", "1", &[c])],
    )
}

#[tokio::test]
async fn test_resolve_prints_closure_sorted_by_name() {
    let registry = MockRegistryClient::new().with_published(diamond_app());

    let output = run(
        registry,
        &HostlessCatalog::default(),
        Commands::Resolve {
            project_id: "proj-app".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(
        output,
        "app@1.0 resolves 3 package(s)\n  a@1 (a)\n  b@1 (b)\n  c@2 (c)\n"
    );
}

#[tokio::test]
async fn test_resolve_uses_hostless_display_names() {
    let registry = MockRegistryClient::new().with_published(dep("app", "1.0", &[leaf("charts", "3")]));
    let catalog = HostlessCatalog {
        hostless: vec![HostlessComponent {
            name: "Charts".to_string(),
            project_id: HostlessProjectId::Single("proj-charts".to_string()),
        }],
    };

    let output = run(
        registry,
        &catalog,
        Commands::Resolve {
            project_id: "proj-app".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(output.contains("  Charts@3 (charts)\n"));
}

#[tokio::test]
async fn test_resolve_reports_version_conflict() {
    let app = dep(
        "app",
        "1.0",
        &[dep("a", "1", &[leaf("c", "1")]), dep("b", "1", &[leaf("c", "2")])],
    );
    let registry = MockRegistryClient::new().with_published(app);

    let err = run(
        registry,
        &HostlessCatalog::default(),
        Commands::Resolve {
            project_id: "proj-app".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::VersionConflict { pkg_id, .. }) if pkg_id == "c"
    ));
}

#[tokio::test]
async fn test_resolve_unpublished_project_fails() {
    let err = run(
        MockRegistryClient::new(),
        &HostlessCatalog::default(),
        Commands::Resolve {
            project_id: "proj-missing".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::UnpublishedPackage { project_id }) if project_id == "proj-missing"
    ));
}

#[tokio::test]
async fn test_check_import_into_unpublished_host() {
    let registry =
        MockRegistryClient::new().with_published(dep("widgets", "1.0", &[leaf("icons", "2")]));

    let output = run(
        registry,
        &HostlessCatalog::default(),
        Commands::CheckImport {
            host: "site".to_string(),
            candidate: "proj-widgets".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(
        output,
        "widgets@1.0 can be imported into site\nDirect dependencies after import:\n  widgets@1.0\n"
    );
}

#[tokio::test]
async fn test_check_import_flags_available_updates() {
    let registry = MockRegistryClient::new()
        .with_published(leaf("widgets", "1.0"))
        .with_meta(VersionMeta {
            pkg_id: "widgets".to_string(),
            version: "1.1".to_string(),
            description: None,
            published_at: None,
            tags: Vec::new(),
        });

    let output = run(
        registry,
        &HostlessCatalog::default(),
        Commands::CheckImport {
            host: "site".to_string(),
            candidate: "proj-widgets".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(output.contains("  widgets@1.0 (update available: 1.1)\n"));
}

#[tokio::test]
async fn test_check_import_seeds_host_from_its_publication() {
    // The published host already pins shared@1, the candidate wants shared@2
    let host_model = dep("host", "4", &[leaf("shared", "1")]);
    let candidate = dep("widgets", "1.0", &[leaf("shared", "2")]);
    let registry = MockRegistryClient::new()
        .with_published(host_model)
        .with_published(candidate);

    let err = run(
        registry,
        &HostlessCatalog::default(),
        Commands::CheckImport {
            host: "proj-host".to_string(),
            candidate: "proj-widgets".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::VersionConflict { pkg_id, .. }) if pkg_id == "shared"
    ));
}

#[tokio::test]
async fn test_check_import_rejects_cycle_through_host() {
    let host_model = leaf("host", "4");
    let candidate = dep("widgets", "1.0", &[host_model.clone()]);
    let registry = MockRegistryClient::new()
        .with_published(host_model)
        .with_published(candidate);

    let err = run(
        registry,
        &HostlessCatalog::default(),
        Commands::CheckImport {
            host: "proj-host".to_string(),
            candidate: "proj-widgets".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::CircularDependency { .. })
    ));
}

#[tokio::test]
async fn test_dependents_lists_direct_importers() {
    let registry = MockRegistryClient::new().with_published(diamond_app());

    let output = run(
        registry,
        &HostlessCatalog::default(),
        Commands::Dependents {
            project_id: "proj-app".to_string(),
            pkg_id: "c".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(output, "2 package(s) depend on c:\n  a@1 (a)\n  b@1 (b)\n");
}

#[tokio::test]
async fn test_dependents_of_root_is_empty() {
    let registry = MockRegistryClient::new().with_published(diamond_app());

    let output = run(
        registry,
        &HostlessCatalog::default(),
        Commands::Dependents {
            project_id: "proj-app".to_string(),
            pkg_id: "app".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(output, "Nothing in app@1.0 depends on app\n");
}

#[tokio::test]
async fn test_dependents_of_unknown_package_fails() {
    let registry = MockRegistryClient::new().with_published(diamond_app());

    let result = run(
        registry,
        &HostlessCatalog::default(),
        Commands::Dependents {
            project_id: "proj-app".to_string(),
            pkg_id: "zzz".to_string(),
        },
    )
    .await;

    assert!(result.is_err());
}
