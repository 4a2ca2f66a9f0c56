// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sprout - identify plants from photos, keep a garden list, and chat
//! about gardening.
//!
//! This is the binary entry point.

mod doctor;
mod identify;
mod render;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use sprout_config::SproutConfig;
use sprout_core::{ProviderAdapter, SproutError};
use sprout_gemini::GeminiProvider;

use crate::identify::OutputFormat;

/// Sprout - identify plants from photos and chat about gardening.
#[derive(Parser, Debug)]
#[command(name = "sprout", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Identify the plant in an image and print its care card.
    Identify {
        /// Image file (png, jpeg, webp, gif, heic, heif).
        image: PathBuf,
        /// Print the record as JSON.
        #[arg(long, conflicts_with = "markdown")]
        json: bool,
        /// Print the record as labeled markdown.
        #[arg(long)]
        markdown: bool,
    },
    /// Launch the interactive shell (default).
    Shell,
    /// Print the effective configuration with the API key masked.
    Config,
    /// Check configuration, credentials, and connectivity.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => sprout_config::load_and_validate_path(path),
        None => sprout_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            sprout_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);
    tracing::debug!(model = %config.gemini.model, "config loaded");

    let result = match cli.command {
        Some(Commands::Config) => match config.to_redacted_toml() {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(true)
            }
            Err(e) => Err(SproutError::Internal(format!("failed to render config: {e}"))),
        },
        Some(Commands::Doctor { plain }) => {
            let failures = doctor::run_doctor(&config, cli.config.as_deref(), plain).await;
            Ok(failures == 0)
        }
        Some(Commands::Identify {
            image,
            json,
            markdown,
        }) => {
            let format = if json {
                OutputFormat::Json
            } else if markdown {
                OutputFormat::Markdown
            } else {
                OutputFormat::Card
            };
            match build_provider(&config) {
                Ok(provider) => identify::run_identify(provider, &image, format).await,
                Err(e) => Err(e),
            }
        }
        Some(Commands::Shell) | None => match build_provider(&config) {
            Ok(provider) => shell::run_shell(&config, provider).await.map(|()| true),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            std::process::exit(1);
        }
    }
}

/// Builds the Gemini provider. A missing API key fails here, before any
/// interactive surface starts.
fn build_provider(config: &SproutConfig) -> Result<Arc<dyn ProviderAdapter>, SproutError> {
    let provider = GeminiProvider::new(config)?;
    Ok(Arc::new(provider))
}

/// Initializes the tracing subscriber with an env filter.
///
/// `RUST_LOG` takes precedence over `app.log_level`. Logs go to stderr so
/// they never mix with printed results.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sprout={},warn", log_level.trim().to_ascii_lowercase())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn identify_flags_parse() {
        let cli = Cli::try_parse_from(["sprout", "identify", "fern.jpg", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Identify { image, json, markdown }) => {
                assert_eq!(image, PathBuf::from("fern.jpg"));
                assert!(json);
                assert!(!markdown);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn json_and_markdown_conflict() {
        assert!(Cli::try_parse_from(["sprout", "identify", "a.png", "--json", "--markdown"]).is_err());
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::try_parse_from(["sprout", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
        assert!(Cli::try_parse_from(["sprout"]).unwrap().command.is_none());
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from(["sprout", "doctor", "--config", "/tmp/sprout.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sprout.toml")));
    }

    #[test]
    fn missing_key_is_fatal_before_shell() {
        let mut config = SproutConfig::default();
        config.gemini.api_key = None;
        // GEMINI_API_KEY may be set in the environment running the tests.
        if std::env::var("GEMINI_API_KEY").is_err() {
            let err = build_provider(&config).err().expect("missing key must fail");
            assert!(matches!(err, SproutError::Config(_)));
        }
    }
}
