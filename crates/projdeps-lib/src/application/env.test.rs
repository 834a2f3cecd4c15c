use super::*;
use std::env;

fn env_with(pairs: &[(&str, &str)]) -> EnvironmentConfig {
    let mut config = EnvironmentConfig::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "NO_COLOR" => config.no_color = value,
            "FORCE_COLOR" => config.force_color = value,
            "CLICOLOR" => config.clicolor = value,
            "CI" => config.ci = value,
            _ => panic!("unexpected key {}", key),
        }
    }
    config
}

#[test]
fn test_no_color_disables_color() {
    let color = env_with(&[("NO_COLOR", "1")]).apply_color_config(ColorIntent::Auto);
    assert_eq!(color, ColorIntent::Never);

    // Empty NO_COLOR is ignored
    let color = env_with(&[("NO_COLOR", "")]).apply_color_config(ColorIntent::Auto);
    assert_eq!(color, ColorIntent::Auto);
}

#[test]
fn test_force_color_wins_over_no_color_and_clicolor() {
    let color = env_with(&[("CLICOLOR", "0"), ("NO_COLOR", "1"), ("FORCE_COLOR", "1")])
        .apply_color_config(ColorIntent::Auto);
    assert_eq!(color, ColorIntent::Always);

    let color = env_with(&[("FORCE_COLOR", "false")]).apply_color_config(ColorIntent::Always);
    assert_eq!(color, ColorIntent::Never);
}

#[test]
fn test_ci_always_disables_color() {
    let color = env_with(&[("CI", "true"), ("FORCE_COLOR", "1")]).apply_color_config(ColorIntent::Always);
    assert_eq!(color, ColorIntent::Never);
}

#[test]
fn test_unknown_force_color_value_is_ignored() {
    let color = env_with(&[("FORCE_COLOR", "maybe")]).apply_color_config(ColorIntent::Never);
    assert_eq!(color, ColorIntent::Never);
}

#[test]
fn test_load_reads_process_environment() {
    // Only this test touches these variables
    unsafe {
        env::set_var("CLICOLOR", "0");
    }

    let env_config = EnvironmentConfig::load().unwrap();
    assert_eq!(env_config.clicolor.as_deref(), Some("0"));

    unsafe {
        env::remove_var("CLICOLOR");
    }
}
