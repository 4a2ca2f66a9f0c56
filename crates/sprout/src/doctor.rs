// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sprout doctor` command implementation.
//!
//! Checks the loaded configuration, the Gemini credential, and that the
//! configured model is reachable.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use colored::Colorize;
use sprout_config::SproutConfig;
use sprout_core::{HealthStatus, PluginAdapter};
use sprout_gemini::GeminiProvider;

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Runs all checks, prints them, and returns the number of failures.
pub async fn run_doctor(config: &SproutConfig, config_path: Option<&Path>, plain: bool) -> usize {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = run_checks(config, config_path).await;

    println!();
    println!("  sprout doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_result(result, use_color));
    }

    let fails = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let warns = results.iter().filter(|r| r.status == CheckStatus::Warn).count();
    println!();
    println!("  {} checks, {fails} failed, {warns} warnings", results.len());
    fails
}

pub async fn run_checks(config: &SproutConfig, config_path: Option<&Path>) -> Vec<CheckResult> {
    let mut results = vec![check_config(config, config_path)];

    let start = Instant::now();
    match GeminiProvider::new(config) {
        Ok(provider) => {
            results.push(CheckResult {
                name: "api key",
                status: CheckStatus::Pass,
                message: "Gemini API key found".into(),
                duration: start.elapsed(),
            });
            results.push(check_model(&provider, &config.gemini.model).await);
        }
        Err(e) => {
            results.push(CheckResult {
                name: "api key",
                status: CheckStatus::Fail,
                message: e.to_string(),
                duration: start.elapsed(),
            });
            results.push(CheckResult {
                name: "model",
                status: CheckStatus::Warn,
                message: "skipped (no API key)".into(),
                duration: Duration::ZERO,
            });
        }
    }
    results
}

fn check_config(config: &SproutConfig, config_path: Option<&Path>) -> CheckResult {
    let sources = sprout_config::collect_toml_sources();
    let message = if let Some(path) = config_path {
        format!("loaded {}", path.display())
    } else if sources.is_empty() {
        format!("defaults (model {})", config.gemini.model)
    } else {
        let paths: Vec<&str> = sources.iter().map(|(p, _)| p.as_str()).collect();
        format!("loaded {}", paths.join(", "))
    };
    CheckResult {
        name: "config",
        status: CheckStatus::Pass,
        message,
        duration: Duration::ZERO,
    }
}

async fn check_model(provider: &GeminiProvider, model: &str) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match provider.health_check().await {
        Ok(HealthStatus::Healthy) => (CheckStatus::Pass, format!("{model} reachable")),
        Ok(HealthStatus::Degraded(reason)) => (CheckStatus::Warn, reason),
        Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "model",
        status,
        message,
        duration: start.elapsed(),
    }
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    let (symbol, message) = match (result.status, use_color) {
        (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.clone()),
        (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow().to_string()),
        (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red().to_string()),
        (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.clone()),
        (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.clone()),
        (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.clone()),
    };
    format!("    {symbol} {:<10} {message} ({duration_ms}ms)", result.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn plain_format() {
        let line = format_result(
            &CheckResult {
                name: "model",
                status: CheckStatus::Fail,
                message: "unreachable".into(),
                duration: Duration::from_millis(12),
            },
            false,
        );
        assert_eq!(line, "    [FAIL] model      unreachable (12ms)");
    }

    #[tokio::test]
    async fn healthy_model_passes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/gemini-2.5-flash"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "models/gemini-2.5-flash"
            })))
            .mount(&server)
            .await;

        let mut config = SproutConfig::default();
        config.gemini.api_key = Some("test-key".into());
        config.gemini.api_base = server.uri();

        let results = run_checks(&config, None).await;
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status == CheckStatus::Pass), "{results:?}");
    }

    #[tokio::test]
    async fn rejected_key_fails_model_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let mut config = SproutConfig::default();
        config.gemini.api_key = Some("bad-key".into());
        config.gemini.api_base = server.uri();

        let results = run_checks(&config, None).await;
        let model = results.iter().find(|r| r.name == "model").unwrap();
        assert_eq!(model.status, CheckStatus::Fail);
        assert!(model.message.contains("API key not valid"));
    }
}
