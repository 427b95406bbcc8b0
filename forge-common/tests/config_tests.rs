//! Configuration resolution and graceful degradation tests
//!
//! Note: uses the serial_test crate to prevent ENV variable race
//! conditions. Tests that manipulate FORGE_* variables are marked with
//! #[serial] so they run sequentially, not in parallel.

use forge_common::config::{
    default_config_path, load_toml_config, write_toml_config, IntakeConfig, TomlConfig,
    DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_API_BASE_URL, DEFAULT_DEBOUNCE_MS,
};
use serial_test::serial;
use std::env;
use std::time::Duration;

fn clear_forge_env() {
    env::remove_var("FORGE_API_BASE_URL");
    env::remove_var("FORGE_API_TOKEN");
    env::remove_var("FORGE_DEBOUNCE_MS");
    env::remove_var("FORGE_ANALYSIS_TIMEOUT_SECS");
}

#[test]
#[serial]
fn defaults_apply_with_no_overrides() {
    clear_forge_env();

    let config = IntakeConfig::resolve_from(None, None);

    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.api_token, None);
    assert_eq!(config.debounce, Duration::from_millis(DEFAULT_DEBOUNCE_MS));
    assert_eq!(
        config.analysis_timeout,
        Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS)
    );
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn cli_argument_beats_env_and_toml() {
    clear_forge_env();
    env::set_var("FORGE_API_BASE_URL", "https://env.example.com");

    let toml = TomlConfig {
        api_base_url: Some("https://toml.example.com".to_string()),
        ..Default::default()
    };
    let config = IntakeConfig::resolve_from(Some("https://cli.example.com"), Some(&toml));

    assert_eq!(config.api_base_url, "https://cli.example.com");

    clear_forge_env();
}

#[test]
#[serial]
fn env_beats_toml() {
    clear_forge_env();
    env::set_var("FORGE_API_BASE_URL", "https://env.example.com");
    env::set_var("FORGE_DEBOUNCE_MS", "250");

    let toml = TomlConfig {
        api_base_url: Some("https://toml.example.com".to_string()),
        debounce_ms: Some(100),
        ..Default::default()
    };
    let config = IntakeConfig::resolve_from(None, Some(&toml));

    assert_eq!(config.api_base_url, "https://env.example.com");
    assert_eq!(config.debounce, Duration::from_millis(250));

    clear_forge_env();
}

#[test]
#[serial]
fn toml_values_apply_when_env_absent() {
    clear_forge_env();

    let toml = TomlConfig {
        api_base_url: Some("https://toml.example.com/".to_string()),
        api_token: Some("secret-token".to_string()),
        debounce_ms: Some(100),
        analysis_timeout_secs: Some(5),
        ..Default::default()
    };
    let config = IntakeConfig::resolve_from(None, Some(&toml));

    // Trailing slash is normalized away
    assert_eq!(config.api_base_url, "https://toml.example.com");
    assert_eq!(config.api_token.as_deref(), Some("secret-token"));
    assert_eq!(config.debounce, Duration::from_millis(100));
    assert_eq!(config.analysis_timeout, Duration::from_secs(5));
}

#[test]
#[serial]
fn unparsable_env_value_falls_through() {
    clear_forge_env();
    env::set_var("FORGE_DEBOUNCE_MS", "not-a-number");

    let config = IntakeConfig::resolve_from(None, None);
    assert_eq!(config.debounce, Duration::from_millis(DEFAULT_DEBOUNCE_MS));

    clear_forge_env();
}

#[test]
#[serial]
fn blank_token_is_treated_as_unset() {
    clear_forge_env();

    let toml = TomlConfig {
        api_token: Some("   ".to_string()),
        ..Default::default()
    };
    let config = IntakeConfig::resolve_from(None, Some(&toml));
    assert_eq!(config.api_token, None);
}

#[test]
fn toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("intake.toml");

    let config = TomlConfig {
        api_base_url: Some("https://api.example.com".to_string()),
        api_token: None,
        debounce_ms: Some(500),
        analysis_timeout_secs: Some(60),
        ..Default::default()
    };

    write_toml_config(&config, &path).unwrap();
    let loaded = load_toml_config(&path).unwrap();

    assert_eq!(loaded.api_base_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(loaded.debounce_ms, Some(500));
    assert_eq!(loaded.logging.level, "info");
}

#[test]
fn missing_file_is_a_config_error_not_a_panic() {
    let err = load_toml_config(std::path::Path::new("/nonexistent/intake.toml"));
    assert!(err.is_err());
}

#[test]
fn default_path_lives_under_campaignforge_dir() {
    if let Some(path) = default_config_path() {
        assert!(path.to_string_lossy().contains("campaignforge"));
        assert!(path.ends_with("intake.toml"));
    }
}
