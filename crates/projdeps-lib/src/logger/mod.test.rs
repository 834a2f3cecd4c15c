use super::*;

#[test]
fn test_filter_directives_scope_crate_and_quiet_dependencies() {
    let directives = Logger::filter_directives(LogLevel::Debug);
    assert!(directives.starts_with("projdeps_lib=debug,"));
    assert!(directives.contains("reqwest=warn"));
    assert!(directives.contains("hyper_util=warn"));
    assert!(directives.ends_with(",debug"));
}

#[test]
fn test_filter_directives_parse_as_env_filter() {
    for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
        let directives = Logger::filter_directives(level);
        assert!(
            EnvFilter::try_new(&directives).is_ok(),
            "directives should parse: {}",
            directives
        );
    }
}

#[test]
fn test_second_init_is_rejected() {
    let config = LoggerConfig {
        level: LogLevel::Error,
        format: LogFormat::Text,
        output: LogOutput::Stderr,
        ansi: false,
    };

    // Another test binary thread may already own the global subscriber.
    let _ = Logger::init(config.clone());

    if let Some(logger) = Logger::global() {
        assert_eq!(logger.config().level, LogLevel::Error);
        assert!(matches!(
            Logger::init(config),
            Err(LoggerError::AlreadyInitialized)
        ));
    }
}
