// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflows that sit between the user surface and the remote provider.
//!
//! - [`identify`]: the plant identification state machine, guarded by a
//!   generation token so a superseded request can never commit its result.
//! - [`chat`]: the gardening chat transcript with a single outstanding reply.

pub mod chat;
pub mod identify;

pub use chat::{CONNECTION_APOLOGY, ChatSession, RejectReason, SendOutcome};
pub use identify::{
    ANALYSIS_ERROR_MESSAGE, Generation, IdentificationWorkflow, IdentifyState,
    UNEXPECTED_FORMAT_MESSAGE,
};
