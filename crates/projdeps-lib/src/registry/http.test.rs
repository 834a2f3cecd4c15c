// Tests for the HTTP registry client against a local mock server

use super::*;
use mockito::Server;

#[test]
fn test_base_url_trailing_slash_is_trimmed() {
    let client = HttpRegistryClient::with_client(Client::new(), "http://registry.local/");
    assert_eq!(client.base_url(), "http://registry.local");
}

#[tokio::test]
async fn test_get_pkg_by_project_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/projects/proj-ui/pkg")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"pkg":{"id":"pkg-ui","projectId":"proj-ui","name":"UI Kit"}}"#)
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    let pkg = client.get_pkg_by_project_id("proj-ui").await.unwrap().unwrap();

    assert_eq!(pkg.id, "pkg-ui");
    assert_eq!(pkg.name, "UI Kit");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unpublished_project_is_none() {
    let mut server = Server::new_async().await;
    let _null = server
        .mock("GET", "/api/v1/projects/draft/pkg")
        .with_status(200)
        .with_body(r#"{"pkg":null}"#)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/api/v1/projects/gone/pkg")
        .with_status(404)
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    assert!(client.get_pkg_by_project_id("draft").await.unwrap().is_none());
    assert!(client.get_pkg_by_project_id("gone").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_pkg_version_decodes_nested_tree() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/pkgs/pkg-ui")
        .with_status(200)
        .with_body(
            r#"{
                "model": {
                    "pkgId": "pkg-ui", "version": "2.0.0", "name": "UI Kit", "projectId": "proj-ui",
                    "site": {
                        "uuid": "site-ui",
                        "projectDependencies": [
                            { "pkgId": "pkg-tokens", "version": "1.0.0", "name": "Tokens",
                              "projectId": "proj-tokens", "site": { "uuid": "site-tokens" } }
                        ]
                    }
                },
                "transitiveModels": [
                    { "pkgId": "pkg-tokens", "version": "1.0.0", "name": "Tokens",
                      "projectId": "proj-tokens", "site": { "uuid": "site-tokens" } }
                ]
            }"#,
        )
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    let version = client.get_pkg_version("pkg-ui").await.unwrap();

    assert_eq!(version.model.version, "2.0.0");
    assert_eq!(version.model.site.project_dependencies[0].pkg_id, "pkg-tokens");
    assert_eq!(version.transitive_models.len(), 1);
}

#[tokio::test]
async fn test_missing_pkg_version_is_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/pkgs/nope")
        .with_status(404)
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    let err = client.get_pkg_version("nope").await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { ref id } if id == "nope"));
}

#[tokio::test]
async fn test_server_error_is_reported_with_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/pkgs/pkg-ui/meta")
        .with_status(503)
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    let err = client.get_pkg_version_meta("pkg-ui").await.unwrap_err();
    assert!(matches!(err, RegistryError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_get_pkg_version_meta() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/pkgs/pkg-ui/meta")
        .with_status(200)
        .with_body(r#"{"pkg":{"pkgId":"pkg-ui","version":"2.1.0","tags":["stable"]}}"#)
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    let meta = client.get_pkg_version_meta("pkg-ui").await.unwrap();
    assert_eq!(meta.version, "2.1.0");
    assert_eq!(meta.tags, vec!["stable"]);
    assert!(meta.description.is_none());
}

#[tokio::test]
async fn test_auth_config_defaults_when_absent() {
    let mut server = Server::new_async().await;
    let _enabled = server
        .mock("GET", "/api/v1/projects/locked/app-auth/pub-config")
        .with_status(200)
        .with_body(r#"{"isAuthEnabled":true}"#)
        .create_async()
        .await;
    let _absent = server
        .mock("GET", "/api/v1/projects/open/app-auth/pub-config")
        .with_status(404)
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    assert!(client.get_app_auth_pub_config("locked").await.unwrap().is_auth_enabled);
    assert!(!client.get_app_auth_pub_config("open").await.unwrap().is_auth_enabled);
}

#[tokio::test]
async fn test_malformed_json_is_a_json_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/pkgs/pkg-ui")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = HttpRegistryClient::new(&server.url(), 5).unwrap();
    let err = client.get_pkg_version("pkg-ui").await.unwrap_err();
    assert!(matches!(err, RegistryError::JsonError { .. }));
}
