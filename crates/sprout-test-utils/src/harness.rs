// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the identification workflow, a garden, and a chat
//! session over a [`MockProvider`], plus a temp directory for image fixtures.

use std::path::PathBuf;
use std::sync::Arc;

use sprout_agent::{ChatSession, IdentificationWorkflow, IdentifyState};
use sprout_config::SproutConfig;
use sprout_core::{PlantRecord, SproutError};
use sprout_garden::GardenCollection;

use crate::mock_provider::{MockProvider, MockReply};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    identify_replies: Vec<MockReply>,
    chat_replies: Vec<MockReply>,
    config: SproutConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            identify_replies: Vec::new(),
            chat_replies: Vec::new(),
            config: SproutConfig::default(),
        }
    }

    /// Set scripted identification replies.
    pub fn with_identify_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.identify_replies = replies;
        self
    }

    /// Set scripted chat replies.
    pub fn with_chat_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.chat_replies = replies;
        self
    }

    /// Override the chat greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.config.chat.greeting = greeting.into();
        self
    }

    /// Override the chat system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.chat.system_instruction = instruction.into();
        self
    }

    /// Build the harness, starting the chat session.
    pub async fn build(self) -> Result<TestHarness, SproutError> {
        let temp_dir = tempfile::TempDir::new().map_err(|source| SproutError::Io {
            path: "temp dir".into(),
            source,
        })?;

        tracing::debug!(
            identify_replies = self.identify_replies.len(),
            chat_replies = self.chat_replies.len(),
            "building test harness"
        );
        let provider = Arc::new(MockProvider::new());
        for reply in self.identify_replies {
            provider.push_identify(reply).await;
        }
        for reply in self.chat_replies {
            provider.push_chat(reply).await;
        }

        let workflow = IdentificationWorkflow::new(provider.clone());
        let chat = ChatSession::start(
            provider.clone(),
            &self.config.chat.system_instruction,
            &self.config.chat.greeting,
        )
        .await?;

        Ok(TestHarness {
            provider,
            workflow,
            chat,
            garden: GardenCollection::new(),
            config: self.config,
            temp_dir,
        })
    }
}

/// A full Sprout stack over a mock provider.
pub struct TestHarness {
    pub provider: Arc<MockProvider>,
    pub workflow: IdentificationWorkflow,
    pub chat: ChatSession,
    pub garden: GardenCollection,
    pub config: SproutConfig,
    temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a builder for configuring the harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Writes an image fixture into the harness temp dir.
    pub fn write_image(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, SproutError> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, bytes).map_err(|source| SproutError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }

    /// Writes a fixture named `name` and runs it through the workflow.
    pub async fn identify_fixture(&self, name: &str) -> Result<Option<IdentifyState>, SproutError> {
        let path = self.write_image(name, name.as_bytes())?;
        self.workflow.identify_file(&path).await
    }

    /// The plant record of the current success state, if any.
    pub async fn current_record(&self) -> Option<PlantRecord> {
        self.workflow.state().await.record().cloned()
    }
}
