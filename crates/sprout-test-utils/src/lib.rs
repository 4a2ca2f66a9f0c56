// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sprout integration tests.
//!
//! Provides a scripted provider and a harness wiring the identification
//! workflow, garden, and chat session together, so tests run without the
//! network.
//!
//! # Components
//!
//! - [`MockProvider`] - Provider with queued replies, failures, and delays
//! - [`TestHarness`] - Workflow + garden + chat over a [`MockProvider`]

pub mod harness;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{MockProvider, MockReply};
