//! Integration tests for the CLI command handlers over HTTP
//!
//! Commands run against a local mockito registry and write into a buffer.

use anyhow::Result;
use projdeps_lib::application::{AppConfig, Commands, execute_command_with_registry};
use projdeps_lib::graph::DependencyError;
use projdeps_lib::manager::HostlessCatalog;
use projdeps_lib::testing::leaf;
use projdeps_tests::{RegistryServer, design_system, hostless_pair, marketing_site};
use std::io::Write;
use tempfile::NamedTempFile;

async fn run(server: &RegistryServer, catalog: &HostlessCatalog, command: Commands) -> Result<String> {
    let mut out = Vec::new();
    execute_command_with_registry(command, server.client()?, catalog, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn test_resolve_design_system() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.publish(&design_system()).await?;

    let output = run(
        &server,
        &HostlessCatalog::default(),
        Commands::Resolve {
            project_id: "proj-ds".to_string(),
        },
    )
    .await?;

    assert_eq!(
        output,
        "ds@2 resolves 2 package(s)\n  icons@1 (icons)\n  tokens@1 (tokens)\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_resolve_with_catalog_from_config_file() -> Result<()> {
    let (jquery, slick) = hostless_pair();
    let mut server = RegistryServer::start().await;
    server
        .publish(&projdeps_lib::testing::dep("widgets", "1", &[slick, jquery]))
        .await?;

    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"[[hostless]]
name = "jQuery"
project_id = ["proj-jquery-old", "proj-jquery"]

[[hostless]]
name = "Slick Carousel"
project_id = "proj-slick"
"#
    )?;
    let config = AppConfig {
        hostless_config: Some(file.path().to_path_buf()),
        ..AppConfig::default()
    };
    let catalog = config.load_catalog()?;

    let output = run(
        &server,
        &catalog,
        Commands::Resolve {
            project_id: "proj-widgets".to_string(),
        },
    )
    .await?;

    assert!(output.contains("  jQuery@3 (jquery)\n"));
    assert!(output.contains("  Slick Carousel@1 (slick)\n"));
    Ok(())
}

#[tokio::test]
async fn test_check_import_reports_conflict_with_published_host() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.publish(&marketing_site("2")).await?;
    server.publish(&design_system()).await?;

    let err = run(
        &server,
        &HostlessCatalog::default(),
        Commands::CheckImport {
            host: "proj-marketing".to_string(),
            candidate: "proj-ds".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Cannot import proj-ds into proj-marketing"));
    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::VersionConflict { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_check_import_into_new_project() -> Result<()> {
    let mut server = RegistryServer::start().await;
    server.unpublished("scratch").await;
    server.publish(&design_system()).await?;

    let output = run(
        &server,
        &HostlessCatalog::default(),
        Commands::CheckImport {
            host: "scratch".to_string(),
            candidate: "proj-ds".to_string(),
        },
    )
    .await?;

    assert_eq!(
        output,
        "ds@2 can be imported into scratch\nDirect dependencies after import:\n  ds@2\n  icons@1\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_dependents_over_http() -> Result<()> {
    let shared = leaf("shared", "1");
    let app = projdeps_lib::testing::dep(
        "app",
        "1",
        &[
            projdeps_lib::testing::dep("a", "1", &[shared.clone()]),
            projdeps_lib::testing::dep("b", "1", &[shared]),
        ],
    );
    let mut server = RegistryServer::start().await;
    server.publish(&app).await?;

    let output = run(
        &server,
        &HostlessCatalog::default(),
        Commands::Dependents {
            project_id: "proj-app".to_string(),
            pkg_id: "shared".to_string(),
        },
    )
    .await?;

    assert_eq!(output, "2 package(s) depend on shared:\n  a@1 (a)\n  b@1 (b)\n");
    Ok(())
}
