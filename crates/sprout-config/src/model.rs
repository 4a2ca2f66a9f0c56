// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Default greeting that seeds every chat transcript.
pub const DEFAULT_GREETING: &str = "Hello! What garden question can I dig into for you?";

/// Default system instruction for the gardening chat.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a fun, expert gardening assistant. Give concise, accurate tips and use light, friendly tone with markdown.";

/// Top-level Sprout configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SproutConfig {
    /// Application-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Gardening chat settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl SproutConfig {
    /// Effective configuration as TOML, with the API key masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        if shown.gemini.api_key.is_some() {
            shown.gemini.api_key = Some(REDACTED.to_string());
        }
        toml::to_string_pretty(&shown)
    }
}

const REDACTED: &str = "********";

/// Application-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` requires the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for both identification and chat.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Generative Language REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout in seconds. `None` waits for the service.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
            request_timeout_secs: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Gardening chat configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// System instruction established once per chat session.
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,

    /// Synthetic bot turn that opens every transcript.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_instruction: default_system_instruction(),
            greeting: default_greeting(),
        }
    }
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_toml_masks_api_key() {
        let mut config = SproutConfig::default();
        config.gemini.api_key = Some("AIza-secret".into());
        let rendered = config.to_redacted_toml().unwrap();
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("api_key = \"********\""));
        assert!(rendered.contains("model = \"gemini-2.5-flash\""));
    }

    #[test]
    fn redacted_toml_round_trips_through_parser() {
        let rendered = SproutConfig::default().to_redacted_toml().unwrap();
        let parsed: SproutConfig = toml::from_str(&rendered).unwrap();
        assert!(parsed.gemini.api_key.is_none());
        assert_eq!(parsed.chat.greeting, DEFAULT_GREETING);
    }
}
