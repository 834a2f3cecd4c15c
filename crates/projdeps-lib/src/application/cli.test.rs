use super::*;
use crate::primitives::ColorIntent;

#[test]
fn test_parse_resolve() {
    let cli = Cli::try_parse_from(["projdeps", "resolve", "proj-a"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Resolve {
            project_id: "proj-a".to_string()
        })
    );
}

#[test]
fn test_parse_check_import_requires_host() {
    let cli = Cli::try_parse_from(["projdeps", "check-import", "--host", "site", "widgets"]).unwrap();
    let command = cli.command.unwrap();
    assert_eq!(command.name(), "check-import");
    assert_eq!(
        command,
        Commands::CheckImport {
            host: "site".to_string(),
            candidate: "widgets".to_string()
        }
    );

    assert!(Cli::try_parse_from(["projdeps", "check-import", "widgets"]).is_err());
}

#[test]
fn test_parse_dependents() {
    let cli = Cli::try_parse_from(["projdeps", "dependents", "proj-a", "pkg-b"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Dependents {
            project_id: "proj-a".to_string(),
            pkg_id: "pkg-b".to_string()
        })
    );
}

#[test]
fn test_global_flags_flatten_into_config() {
    let cli = Cli::try_parse_from([
        "projdeps",
        "--registry-url",
        "https://registry.example.com",
        "--color",
        "never",
        "--log-level",
        "2",
        "resolve",
        "proj-a",
    ])
    .unwrap();

    assert_eq!(cli.config.registry_url, "https://registry.example.com");
    assert_eq!(cli.config.color, ColorIntent::Never);
    assert_eq!(cli.config.log_level, 2);
}

#[test]
fn test_no_subcommand_is_allowed() {
    let cli = Cli::try_parse_from(["projdeps"]).unwrap();
    assert!(cli.command.is_none());
}
