// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies and
//! records every call it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sprout_core::{
    ChatHandle, HealthStatus, ImageData, PluginAdapter, ProviderAdapter, SproutError,
};

/// Reply returned when a queue is empty.
pub const DEFAULT_REPLY: &str = "mock response";

/// One scripted reply: text or a transport failure, optionally delayed.
#[derive(Debug, Clone)]
pub struct MockReply {
    outcome: Result<String, String>,
    delay: Duration,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            delay: Duration::ZERO,
        }
    }

    /// A reply that fails with a provider error carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: Duration::ZERO,
        }
    }

    /// Delays the reply by `delay` (virtual time under a paused clock).
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn deliver(self) -> Result<String, SproutError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.map_err(SproutError::provider)
    }
}

/// A mock provider that answers from FIFO queues.
///
/// Identification and chat replies have separate queues. When a queue is
/// empty, [`DEFAULT_REPLY`] is returned.
#[derive(Default)]
pub struct MockProvider {
    identify_replies: Arc<Mutex<VecDeque<MockReply>>>,
    chat_replies: Arc<Mutex<VecDeque<MockReply>>>,
    identify_calls: Arc<Mutex<Vec<ImageData>>>,
    chat_calls: Arc<Mutex<Vec<(ChatHandle, String)>>>,
    created_chats: Arc<Mutex<Vec<(ChatHandle, String)>>>,
    closed_chats: Arc<Mutex<Vec<ChatHandle>>>,
}

impl MockProvider {
    /// Create a new mock provider with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with identification replies.
    pub fn with_identify_replies(replies: Vec<MockReply>) -> Self {
        Self {
            identify_replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::default()
        }
    }

    /// Create a mock provider pre-loaded with chat replies.
    pub fn with_chat_replies(replies: Vec<MockReply>) -> Self {
        Self {
            chat_replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::default()
        }
    }

    pub async fn push_identify(&self, reply: MockReply) {
        self.identify_replies.lock().await.push_back(reply);
    }

    pub async fn push_chat(&self, reply: MockReply) {
        self.chat_replies.lock().await.push_back(reply);
    }

    /// Images received by `identify`, in call order.
    pub async fn identify_calls(&self) -> Vec<ImageData> {
        self.identify_calls.lock().await.clone()
    }

    /// `(handle, text)` pairs received by `send_chat`, in call order.
    pub async fn chat_calls(&self) -> Vec<(ChatHandle, String)> {
        self.chat_calls.lock().await.clone()
    }

    /// `(handle, system instruction)` for every chat created.
    pub async fn created_chats(&self) -> Vec<(ChatHandle, String)> {
        self.created_chats.lock().await.clone()
    }

    /// Handles passed to `close_chat`, in call order.
    pub async fn closed_chats(&self) -> Vec<ChatHandle> {
        self.closed_chats.lock().await.clone()
    }

    async fn next(queue: &Mutex<VecDeque<MockReply>>) -> MockReply {
        queue
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::text(DEFAULT_REPLY))
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SproutError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SproutError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn identify(&self, image: &ImageData) -> Result<String, SproutError> {
        let reply = Self::next(&self.identify_replies).await;
        self.identify_calls.lock().await.push(image.clone());
        reply.deliver().await
    }

    async fn create_chat(&self, system_instruction: &str) -> Result<ChatHandle, SproutError> {
        let handle = ChatHandle::generate();
        self.created_chats
            .lock()
            .await
            .push((handle.clone(), system_instruction.to_string()));
        Ok(handle)
    }

    async fn send_chat(&self, handle: &ChatHandle, text: &str) -> Result<String, SproutError> {
        let reply = Self::next(&self.chat_replies).await;
        self.chat_calls
            .lock()
            .await
            .push((handle.clone(), text.to_string()));
        reply.deliver().await
    }

    async fn close_chat(&self, handle: &ChatHandle) -> Result<(), SproutError> {
        self.closed_chats.lock().await.push(handle.clone());
        Ok(())
    }
}
