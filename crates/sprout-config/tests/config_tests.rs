// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Sprout configuration system.

use figment::Jail;
use sprout_config::diagnostic::ConfigError;
use sprout_config::model::{DEFAULT_GREETING, DEFAULT_SYSTEM_INSTRUCTION};
use sprout_config::{load_and_validate_path, load_and_validate_str, load_config, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_sprout_config() {
    let toml = r#"
[app]
log_level = "debug"

[gemini]
api_key = "test-key"
model = "gemini-2.5-pro"
api_base = "http://localhost:8080/v1beta"
request_timeout_secs = 30

[chat]
system_instruction = "You are a terse botanist."
greeting = "Hi!"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.gemini.api_key.as_deref(), Some("test-key"));
    assert_eq!(config.gemini.model, "gemini-2.5-pro");
    assert_eq!(config.gemini.api_base, "http://localhost:8080/v1beta");
    assert_eq!(config.gemini.request_timeout_secs, Some(30));
    assert_eq!(config.chat.system_instruction, "You are a terse botanist.");
    assert_eq!(config.chat.greeting, "Hi!");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.log_level, "info");
    assert!(config.gemini.api_key.is_none());
    assert_eq!(config.gemini.model, "gemini-2.5-flash");
    assert_eq!(
        config.gemini.api_base,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert!(config.gemini.request_timeout_secs.is_none());
    assert_eq!(config.chat.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);
    assert_eq!(config.chat.greeting, DEFAULT_GREETING);
}

/// Unknown key produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[gemini]
modle = "gemini-2.5-flash"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "modle");
            assert_eq!(suggestion.as_deref(), Some("model"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// A wrongly typed value is reported with its dotted key.
#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[gemini]
request_timeout_secs = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("request_timeout_secs")),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_loader() {
    let toml = r#"
[app]
log_level = "chatty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

/// Environment variables override TOML values and map underscores correctly.
#[test]
fn env_vars_override_local_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "sprout.toml",
            r#"
[gemini]
model = "from-file"
"#,
        )?;
        jail.set_env("SPROUT_GEMINI_MODEL", "from-env");
        jail.set_env("SPROUT_GEMINI_API_KEY", "env-key");
        jail.set_env("SPROUT_CHAT_GREETING", "Howdy");

        let config = load_config()?;
        assert_eq!(config.gemini.model, "from-env");
        assert_eq!(config.gemini.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.chat.greeting, "Howdy");
        Ok(())
    });
}

/// An explicit config path is loaded and validated.
#[test]
fn explicit_path_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[app]\nlog_level = \"warn\"\n").unwrap();

    let config = load_and_validate_path(&path).expect("file should load");
    assert_eq!(config.app.log_level, "warn");
}

/// Unknown keys in an explicit file point at the offending line.
#[test]
fn explicit_path_unknown_key_has_span() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[chat]\ngreting = \"hi\"\n").unwrap();

    let errors = load_and_validate_path(&path).expect_err("should reject unknown field");
    match &errors[0] {
        ConfigError::UnknownKey { span, suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("greeting"));
            assert!(span.is_some(), "span should point at the key");
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}
