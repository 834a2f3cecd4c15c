use clap::Parser;
use projdeps_lib::application::{Cli, CliConfig, Commands};
use projdeps_lib::primitives::{ConfigError, LogFormat};
use std::path::PathBuf;

#[test]
fn test_cli_flags_resolve_into_validated_config() {
    let cli = Cli::try_parse_from([
        "projdeps",
        "--registry-url",
        "https://registry.example.com/",
        "--net-timeout",
        "10",
        "--log-format",
        "json",
        "--hostless-config",
        "/etc/projdeps/hostless.toml",
        "resolve",
        "proj-a",
    ])
    .unwrap();

    let config = CliConfig::from_cli(cli).unwrap();

    assert_eq!(config.app_config.registry_url, "https://registry.example.com");
    assert_eq!(config.app_config.net_timeout, 10);
    assert_eq!(config.app_config.log_format, LogFormat::Json);
    assert_eq!(
        config.app_config.hostless_config,
        Some(PathBuf::from("/etc/projdeps/hostless.toml"))
    );
    assert_eq!(
        config.command,
        Some(Commands::Resolve {
            project_id: "proj-a".to_string()
        })
    );
}

#[test]
fn test_invalid_cli_values_fail_validation() {
    let cli = Cli::try_parse_from(["projdeps", "--net-timeout", "0", "resolve", "proj-a"]).unwrap();

    assert!(matches!(
        CliConfig::from_cli(cli),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_unknown_log_format_is_a_parse_error() {
    assert!(Cli::try_parse_from(["projdeps", "--log-format", "xml"]).is_err());
}
