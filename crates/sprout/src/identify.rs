// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sprout identify` command implementation.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use sprout_agent::{IdentificationWorkflow, IdentifyState};
use sprout_core::{ProviderAdapter, SproutError};

use crate::render;

/// How a successful identification is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Card,
    Json,
    Markdown,
}

/// Identifies one image and prints the result.
///
/// Returns `true` if a plant was identified.
pub async fn run_identify(
    provider: Arc<dyn ProviderAdapter>,
    image: &Path,
    format: OutputFormat,
) -> Result<bool, SproutError> {
    let workflow = IdentificationWorkflow::new(provider);
    eprintln!("{}", "Identifying your plant, please wait...".dimmed());

    let state = workflow
        .identify_file(image)
        .await?
        .ok_or_else(|| SproutError::Internal("identification was superseded".into()))?;

    match state {
        IdentifyState::Success(record) => {
            let out = match format {
                OutputFormat::Card => render::plant_card(&record),
                OutputFormat::Markdown => record.to_markdown(),
                OutputFormat::Json => render::plant_json(&record)
                    .map_err(|e| SproutError::Internal(format!("failed to encode JSON: {e}")))?,
            };
            println!("{out}");
            Ok(true)
        }
        other => {
            eprintln!("{}", other.message().unwrap_or_default().yellow());
            Ok(false)
        }
    }
}
