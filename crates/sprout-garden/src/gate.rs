// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Refusal detection for identification replies.
//!
//! A plain substring test run before parsing. When it trips the reply is
//! shown to the user verbatim and never parsed.

/// Phrases that mark a reply as a refusal (contains, case-insensitive).
pub const REFUSAL_PHRASES: &[&str] = &["not a plant", "unidentifiable", "sorry"];

/// Returns the first refusal phrase found in `text`, if any.
pub fn refusal_phrase(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    REFUSAL_PHRASES
        .iter()
        .copied()
        .find(|phrase| lower.contains(phrase))
}

/// Returns true when `text` should be surfaced as an explanation instead of parsed.
pub fn is_refusal(text: &str) -> bool {
    refusal_phrase(text).is_some()
}
