// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sprout.toml` > `~/.config/sprout/sprout.toml` > `/etc/sprout/sprout.toml`
//! with environment variable overrides via `SPROUT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SproutConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sprout/sprout.toml` (system-wide)
/// 3. `~/.config/sprout/sprout.toml` (user XDG config)
/// 4. `./sprout.toml` (local directory)
/// 5. `SPROUT_*` environment variables
pub fn load_config() -> Result<SproutConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SproutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SproutConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SproutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SproutConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SproutConfig::default()))
        .merge(Toml::file("/etc/sprout/sprout.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sprout/sprout.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sprout.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that underscore-containing
/// keys survive: `SPROUT_GEMINI_API_KEY` maps to `gemini.api_key`, not `gemini.api.key`.
pub fn env_provider() -> Env {
    Env::prefixed("SPROUT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("app_", "app.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("chat_", "chat.", 1);
        mapped.into()
    })
}
