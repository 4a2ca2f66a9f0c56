// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment failures into miette diagnostics for `sprout.toml`.
//!
//! Typos in section keys get a "did you mean?" hint and, when the offending
//! file is known, a labelled span pointing at the key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a candidate key must beat to be offered as a hint.
const HINT_SCORE: f64 = 0.75;

/// One problem found while loading or validating the configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("`{key}` is not a recognized sprout setting")]
    #[diagnostic(
        code(sprout::config::unknown_key),
        help("{}", unknown_key_hint(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Keys accepted in the same section, comma separated.
        valid_keys: String,
        #[label("unrecognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(sprout::config::invalid_type), help("use a {expected} value"))]
    InvalidType {
        /// Dotted path such as `gemini.request_timeout_secs`.
        key: String,
        detail: String,
        expected: String,
    },

    #[error("`{key}` must be set")]
    #[diagnostic(
        code(sprout::config::missing_key),
        help("add `{key} = ...` to sprout.toml")
    )]
    MissingKey { key: String },

    /// A value parsed but is out of range or otherwise unusable.
    #[error("invalid setting: {message}")]
    #[diagnostic(code(sprout::config::validation))]
    Validation { message: String },

    #[error("could not load configuration: {0}")]
    #[diagnostic(code(sprout::config::other))]
    Other(String),
}

fn unknown_key_hint(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(close) => format!("did you mean `{close}`? Accepted here: {valid_keys}"),
        None => format!("accepted here: {valid_keys}"),
    }
}

/// Split a figment error into one [`ConfigError`] per underlying failure.
///
/// `toml_sources` holds `(path, contents)` pairs for every TOML layer that
/// was merged, so unknown keys can be pointed at in the file they came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = locate_key(&error, field, toml_sources).unzip();
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: dotted(&error.path, Some(&**field)),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: dotted(&error.path, None),
                detail: format!("found {actual}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

fn dotted(path: &[String], leaf: Option<&str>) -> String {
    path.iter()
        .map(String::as_str)
        .chain(leaf)
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolve the file an unknown key came from and the key's span within it.
fn locate_key(
    error: &figment::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline strings carry no path and file paths may be canonicalized, so a
    // single merged source is taken as the origin.
    let (path, content) = origin
        .and_then(|origin| toml_sources.iter().find(|(p, _)| *p == origin))
        .or(match toml_sources {
            [only] => Some(only),
            _ => None,
        })?;

    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(path, content.clone()),
    ))
}

/// Byte offset of `field` as a key in `content`, looked up under the
/// `[section]` header named by the first element of `path`.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let is_key = line[indent..]
            .strip_prefix(field)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c == '=' || c == ' ' || c == '\t');
        if is_key {
            return Some(line_start + indent);
        }
        if line_start > start && line.trim_start().starts_with('[') {
            // Ran into the next section.
            return None;
        }
        line_start += line.len();
    }
    None
}

/// Closest accepted key to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > HINT_SCORE)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print each error to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
