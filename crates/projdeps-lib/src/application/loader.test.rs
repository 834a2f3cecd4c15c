use super::*;
use crate::primitives::ColorIntent;
use std::path::PathBuf;

fn explicit_catalog() -> AppConfig {
    AppConfig {
        hostless_config: Some(PathBuf::from("/etc/projdeps/hostless.toml")),
        ..AppConfig::default()
    }
}

#[test]
fn test_resolve_keeps_defaults_without_overrides() {
    let config = AppConfig::resolve_with_env(explicit_catalog(), &EnvironmentConfig::default()).unwrap();
    assert_eq!(config.registry_url, "http://localhost:3003");
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.color, ColorIntent::Auto);
}

#[test]
fn test_environment_color_applies_below_cli() {
    let env = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    };

    let config = AppConfig::resolve_with_env(explicit_catalog(), &env).unwrap();
    assert_eq!(config.color, ColorIntent::Never);

    let cli = AppConfig {
        color: ColorIntent::Always,
        ..explicit_catalog()
    };
    let config = AppConfig::resolve_with_env(cli, &env).unwrap();
    assert_eq!(config.color, ColorIntent::Always);
}

#[test]
fn test_resolve_validates_cli_values() {
    let cli = AppConfig {
        registry_url: "registry.example.com".to_string(),
        ..explicit_catalog()
    };
    let result = AppConfig::resolve_with_env(cli, &EnvironmentConfig::default());
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_global_config_is_set_once() {
    let _ = AppConfig::init_global(explicit_catalog());
    assert!(AppConfig::global().is_some());
    assert!(matches!(
        AppConfig::init_global(AppConfig::default()),
        Err(ConfigError::AlreadyInitialized)
    ));
}
