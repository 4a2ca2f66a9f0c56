// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the remote multimodal AI service.

use async_trait::async_trait;

use crate::error::SproutError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatHandle, ImageData};

/// Adapter for the remote AI service.
///
/// Covers the single-turn image identification call and a stateful chat in
/// which the provider keeps prior turns keyed by [`ChatHandle`].
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Asks the service to identify the plant in `image`.
    ///
    /// Returns the raw reply text; interpreting it is the caller's job.
    async fn identify(&self, image: &ImageData) -> Result<String, SproutError>;

    /// Opens a chat session governed by `system_instruction`.
    async fn create_chat(&self, system_instruction: &str) -> Result<ChatHandle, SproutError>;

    /// Sends one user turn on an existing session and returns the reply text.
    async fn send_chat(&self, handle: &ChatHandle, text: &str) -> Result<String, SproutError>;

    /// Discards the session's stored turns. Unknown handles are ignored.
    async fn close_chat(&self, handle: &ChatHandle) -> Result<(), SproutError>;
}
