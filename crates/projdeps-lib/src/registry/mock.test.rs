use super::*;
use crate::testing::{dep, leaf};

#[tokio::test]
async fn test_published_dependency_is_served() {
    let ui = dep("ui", "2", &[dep("tokens", "1", &[leaf("colors", "1")])]);
    let registry = MockRegistryClient::new().with_published(Arc::clone(&ui));

    let pkg = registry.get_pkg_by_project_id("proj-ui").await.unwrap().unwrap();
    assert_eq!(pkg.id, "ui");

    let version = registry.get_pkg_version("ui").await.unwrap();
    assert!(Arc::ptr_eq(&version.model, &ui));
    let transitive: Vec<&str> = version
        .transitive_models
        .iter()
        .map(|d| d.pkg_id.as_str())
        .collect();
    assert_eq!(transitive, vec!["tokens", "colors"]);

    assert_eq!(registry.get_pkg_version_meta("ui").await.unwrap().version, "2");
}

#[tokio::test]
async fn test_unknown_project_has_no_pkg() {
    let registry = MockRegistryClient::new();
    assert!(registry.get_pkg_by_project_id("nobody").await.unwrap().is_none());
    assert!(matches!(
        registry.get_pkg_version("nobody").await,
        Err(RegistryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_failure_and_auth_toggles() {
    let registry = MockRegistryClient::new()
        .with_auth_enabled("proj-locked")
        .with_failure("flaky");

    assert!(
        registry
            .get_app_auth_pub_config("proj-locked")
            .await
            .unwrap()
            .is_auth_enabled
    );
    assert!(matches!(
        registry.get_pkg_version_meta("flaky").await,
        Err(RegistryError::Unavailable { .. })
    ));
    assert_eq!(
        registry.calls().await,
        vec![
            "get_app_auth_pub_config proj-locked",
            "get_pkg_version_meta flaky"
        ]
    );
}
