// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SproutConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &SproutConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.app.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.model must not be empty".to_string(),
        });
    }

    let base = config.gemini.api_base.trim();
    if !(base.starts_with("https://") || base.starts_with("http://")) {
        errors.push(ConfigError::Validation {
            message: format!("gemini.api_base `{base}` must be an http(s) URL"),
        });
    }

    if config.gemini.request_timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "gemini.request_timeout_secs must be greater than zero when set".to_string(),
        });
    }

    if config.chat.system_instruction.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "chat.system_instruction must not be empty".to_string(),
        });
    }

    if config.chat.greeting.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "chat.greeting must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
