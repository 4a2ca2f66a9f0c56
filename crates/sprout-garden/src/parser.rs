// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of a [`PlantRecord`] from an identification reply.
//!
//! The reply is loosely structured markdown: one `**Label:** value` pair per
//! line, with a multi-line description. Each field has its own pattern and
//! is matched independently against the whole text, so label order does not
//! matter. The description runs until the next `\n- **` marker or the end of
//! the text; labels embedded inside it are never promoted to fields.
//!
//! The stop marker must start a line. An indented `  - **Sunlight:**` right
//! after the description is absorbed into it, while the sunlight pattern
//! still picks the value up on its own.
//!
//! Common Name and Scientific Name are required. Every other field falls back
//! to its placeholder when its label is absent.

use std::sync::LazyLock;

use regex::Regex;
use sprout_core::{CareInstructions, ImageData, PlantRecord};
use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;
use tracing::debug;

/// Placeholder for a missing description.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Placeholder for every other missing optional field.
pub const NOT_AVAILABLE: &str = "N/A";

/// The labeled fields an identification reply may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PlantField {
    #[strum(to_string = "Common Name")]
    CommonName,
    #[strum(to_string = "Scientific Name")]
    ScientificName,
    #[strum(to_string = "Description")]
    Description,
    #[strum(to_string = "Sunlight")]
    Sunlight,
    #[strum(to_string = "Watering")]
    Watering,
    #[strum(to_string = "Soil")]
    Soil,
    #[strum(to_string = "Fertilizer")]
    Fertilizer,
    #[strum(to_string = "Toxicity")]
    Toxicity,
    #[strum(to_string = "Common Pests")]
    CommonPests,
}

impl PlantField {
    /// Placeholder used when the field is absent. `None` marks a required field.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            PlantField::CommonName | PlantField::ScientificName => None,
            PlantField::Description => Some(NO_DESCRIPTION),
            _ => Some(NOT_AVAILABLE),
        }
    }

    pub fn is_required(self) -> bool {
        self.default_value().is_none()
    }

    fn pattern(self) -> Regex {
        let label = regex::escape(&format!("**{self}:** "));
        let source = match self {
            // Lazy, stops before the next list marker or at the end of text.
            PlantField::Description => format!(r"(?s){label}(.*?)(?:\n- \*\*|\n?\z)"),
            _ => format!("{label}(.*)"),
        };
        Regex::new(&source).unwrap()
    }
}

static FIELD_PATTERNS: LazyLock<Vec<(PlantField, Regex)>> = LazyLock::new(|| {
    PlantField::iter()
        .map(|field| (field, field.pattern()))
        .collect()
});

/// Why a reply could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// A required label was absent or had nothing after it.
    #[error("reply is missing required field `{0}`")]
    MissingRequired(PlantField),
}

/// Returns the raw (untrimmed) capture of the first match for `field`.
pub fn extract(text: &str, field: PlantField) -> Option<&str> {
    FIELD_PATTERNS
        .iter()
        .find(|(f, _)| *f == field)
        .and_then(|(_, re)| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn required(text: &str, field: PlantField) -> Result<String, ParseFailure> {
    match extract(text, field).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ParseFailure::MissingRequired(field)),
    }
}

/// A present label yields its trimmed value, even when that is empty.
fn optional(text: &str, field: PlantField) -> String {
    match extract(text, field) {
        Some(value) => value.trim().to_string(),
        None => field.default_value().unwrap_or(NOT_AVAILABLE).to_string(),
    }
}

/// Parses an identification reply into a record tied to `source_image`.
pub fn parse(text: &str, source_image: ImageData) -> Result<PlantRecord, ParseFailure> {
    let common_name = required(text, PlantField::CommonName)?;
    let scientific_name = required(text, PlantField::ScientificName)?;

    let record = PlantRecord {
        common_name,
        scientific_name,
        description: optional(text, PlantField::Description),
        care: CareInstructions {
            sunlight: optional(text, PlantField::Sunlight),
            watering: optional(text, PlantField::Watering),
            soil: optional(text, PlantField::Soil),
            fertilizer: optional(text, PlantField::Fertilizer),
        },
        toxicity: optional(text, PlantField::Toxicity),
        common_pests: optional(text, PlantField::CommonPests),
        source_image,
    };

    debug!(
        common_name = record.common_name.as_str(),
        scientific_name = record.scientific_name.as_str(),
        "parsed plant record"
    );
    Ok(record)
}
