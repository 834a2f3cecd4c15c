use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.registry_url, "http://localhost:3003");
    assert_eq!(config.log_level, 0);
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.color, ColorIntent::Auto);
    assert!(config.hostless_config.is_none());
}

#[test]
fn test_defaults_agree_with_clap_defaults() {
    assert_eq!(defaults::NET_TIMEOUT.parse::<u64>().unwrap(), default_fns::net_timeout());
    assert_eq!(defaults::LOG_LEVEL.parse::<u8>().unwrap(), default_fns::log_level());
    assert_eq!(defaults::LOG_FORMAT.parse::<LogFormat>().unwrap(), default_fns::log_format());
    assert_eq!(defaults::LOG_OUTPUT.parse::<LogOutput>().unwrap(), default_fns::log_output());
    assert_eq!(defaults::COLOR.parse::<ColorIntent>().unwrap(), default_fns::color());
}

#[test]
fn test_config_merging() {
    let base = AppConfig::default();
    let override_config = AppConfig {
        registry_url: "https://registry.example.com".to_string(),
        log_level: 4,
        color: ColorIntent::Always,
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.registry_url, "https://registry.example.com");
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.color, ColorIntent::Always);
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_validate_normalizes_registry_url() {
    let mut config = AppConfig {
        registry_url: "https://registry.example.com/".to_string(),
        hostless_config: Some(PathBuf::from("/explicit/hostless.toml")),
        ..AppConfig::default()
    };
    config.validate().unwrap();
    assert_eq!(config.registry_url, "https://registry.example.com");
    assert_eq!(
        config.hostless_config,
        Some(PathBuf::from("/explicit/hostless.toml"))
    );
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut bad_url = AppConfig {
        registry_url: "ftp://registry".to_string(),
        ..AppConfig::default()
    };
    assert!(matches!(
        bad_url.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));

    let mut zero_timeout = AppConfig {
        net_timeout: 0,
        ..AppConfig::default()
    };
    assert!(matches!(
        zero_timeout.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_logger_config_resolves_color() {
    let config = AppConfig {
        log_level: 3,
        ..AppConfig::default()
    };
    let logger = config.to_logger_config(true);
    assert_eq!(logger.level, LogLevel::Debug);
    assert!(logger.ansi);
    assert!(!config.to_logger_config(false).ansi);

    let never = AppConfig {
        color: ColorIntent::Never,
        ..AppConfig::default()
    };
    assert!(!never.to_logger_config(true).ansi);
}

#[test]
fn test_load_catalog_from_configured_path() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[[hostless]]\nname = \"Charts\"\nproject_id = \"charts\"").unwrap();

    let config = AppConfig {
        hostless_config: Some(file.path().to_path_buf()),
        ..AppConfig::default()
    };
    let catalog = config.load_catalog().unwrap();
    assert_eq!(catalog.hostless.len(), 1);

    assert!(AppConfig::default().load_catalog().unwrap().hostless.is_empty());
}
