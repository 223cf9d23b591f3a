use super::data::{Config, PersonaOverride};
use super::defaults::{DEFAULT_EXIT_PHRASE, DEFAULT_PREFERRED_MODELS};
use super::error::ConfigError;
use crate::api::DEFAULT_BASE_URL;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert!(config.api_key.is_none());
    assert!(config.personas.is_empty());
}

#[test]
fn test_defaults_apply_when_unset() {
    let config = Config::default();
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    assert_eq!(config.preferred_models().len(), DEFAULT_PREFERRED_MODELS.len());
    assert_eq!(config.preferred_models()[0], "models/gemini-1.5-flash");
    assert_eq!(config.model_family_marker(), "gemini");
    assert_eq!(config.request_timeout(), Duration::from_secs(60));
    assert_eq!(config.exit_phrase(), DEFAULT_EXIT_PHRASE);
    assert!(config.pinned_model().is_none());
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let config = Config {
        base_url: Some("  ".to_string()),
        model_family_marker: Some(String::new()),
        pinned_model: Some("   ".to_string()),
        request_timeout_secs: Some(0),
        exit_phrase: Some(" ".to_string()),
        ..Default::default()
    };
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    assert_eq!(config.model_family_marker(), "gemini");
    assert!(config.pinned_model().is_none());
    assert_eq!(config.request_timeout(), Duration::from_secs(60));
    assert_eq!(config.exit_phrase(), DEFAULT_EXIT_PHRASE);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config {
        preferred_models: vec!["models/gemini-2.0-flash".to_string()],
        default_persona: Some("family-mother".to_string()),
        request_timeout_secs: Some(15),
        ..Default::default()
    };
    config.personas.insert(
        "family-father".to_string(),
        PersonaOverride {
            greeting: Some("아버지, 안녕하세요".to_string()),
            ..Default::default()
        },
    );
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.preferred_models(), vec!["models/gemini-2.0-flash"]);
    assert_eq!(loaded.default_persona.as_deref(), Some("family-mother"));
    assert_eq!(loaded.request_timeout(), Duration::from_secs(15));
    let father = loaded
        .persona_override("Family-Father")
        .expect("override survives round trip");
    assert_eq!(father.greeting.as_deref(), Some("아버지, 안녕하세요"));
    assert!(father.system_prompt.is_none());
}

#[test]
fn test_parse_error_names_the_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "preferred_models = \"not a list\"").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("invalid toml must fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_missing_credential_is_fatal_with_hints() {
    let err = ConfigError::MissingCredential;
    assert_eq!(err.exit_code(), 2);
    assert!(!err.quick_fixes().is_empty());
}
