// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plant-side logic for Sprout: the refusal gate, the identification reply
//! parser, and the in-memory garden collection.

pub mod collection;
pub mod gate;
pub mod parser;

pub use collection::{DuplicatePlant, GardenCollection};
pub use gate::{REFUSAL_PHRASES, is_refusal, refusal_phrase};
pub use parser::{NO_DESCRIPTION, NOT_AVAILABLE, ParseFailure, PlantField, parse};
