// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Sprout.
//!
//! Provides the adapter traits, error type, and the plant and chat types
//! shared by the parser, the workflows, and the Gemini adapter.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SproutError;
pub use traits::{PluginAdapter, ProviderAdapter};
pub use types::{
    CareInstructions, ChatHandle, ChatTurn, HealthStatus, ImageData, PlantRecord, Sender,
};
