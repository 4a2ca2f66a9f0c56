// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for Sprout.
//!
//! Implements [`ProviderAdapter`] on top of the `generateContent` REST API.
//! Plant identification is a single multimodal turn; gardening chat keeps
//! each session's prior turns here, keyed by [`ChatHandle`], and replays
//! them with every request.

pub mod client;
pub mod types;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sprout_config::SproutConfig;
use sprout_core::{
    ChatHandle, HealthStatus, ImageData, PluginAdapter, ProviderAdapter, SproutError,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, Part};

/// Environment variable consulted when `gemini.api_key` is not configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Instruction sent alongside every image to identify.
pub const IDENTIFY_PROMPT: &str = "Identify the plant in this image.
If it's not a plant or is unidentifiable, state that clearly.
If it is a plant, provide the following information in a structured format using markdown:
- **Common Name:** 
- **Scientific Name:** 
- **Description:** A brief overview of the plant.
- **Care Instructions:**
  - **Sunlight:** 
  - **Watering:** 
  - **Soil:** 
  - **Fertilizer:** 
- **Additional Details:**
  - **Toxicity:** (Mention if it's toxic to pets or humans)
  - **Common Pests:** (List common pests for this plant)";

/// Conversation state for one chat handle.
#[derive(Debug, Clone)]
struct ChatState {
    system_instruction: String,
    history: Vec<Content>,
}

/// Gemini provider implementing the Sprout adapter traits.
pub struct GeminiProvider {
    client: GeminiClient,
    chats: Mutex<HashMap<ChatHandle, ChatState>>,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.client.model())
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Creates a provider from Sprout configuration.
    ///
    /// The API key comes from `gemini.api_key`, falling back to the
    /// `GEMINI_API_KEY` environment variable. A missing key is fatal.
    pub fn new(config: &SproutConfig) -> Result<Self, SproutError> {
        let api_key = resolve_api_key(&config.gemini.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            config.gemini.model.clone(),
            config.gemini.api_base.clone(),
            config.gemini.request_timeout_secs.map(Duration::from_secs),
        )?;

        info!(model = %config.gemini.model, "Gemini provider initialized");
        Ok(Self::with_client(client))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self {
            client,
            chats: Mutex::new(HashMap::new()),
        }
    }

    /// Number of open chat sessions.
    pub async fn open_chats(&self) -> usize {
        self.chats.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SproutError> {
        match self.client.get_model().await {
            Ok(info) => {
                debug!(model = %info.name, "Gemini health check passed");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => {
                warn!(error = %e, "Gemini health check failed");
                Ok(HealthStatus::Unhealthy(e.to_string()))
            }
        }
    }

    async fn shutdown(&self) -> Result<(), SproutError> {
        let mut chats = self.chats.lock().await;
        debug!(open = chats.len(), "dropping chat sessions");
        chats.clear();
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn identify(&self, image: &ImageData) -> Result<String, SproutError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline_data(image.mime_type.clone(), image.data.clone()),
                Part::text(IDENTIFY_PROMPT),
            ])],
            system_instruction: None,
        };

        debug!(mime_type = %image.mime_type, bytes = image.data.len(), "sending identification request");
        let response = self.client.generate_content(&request).await?;
        response
            .text()
            .ok_or_else(|| SproutError::provider(format!("Gemini {}", response.empty_reason())))
    }

    async fn create_chat(&self, system_instruction: &str) -> Result<ChatHandle, SproutError> {
        let handle = ChatHandle::generate();
        self.chats.lock().await.insert(
            handle.clone(),
            ChatState {
                system_instruction: system_instruction.to_string(),
                history: Vec::new(),
            },
        );
        info!(chat = %handle, "chat session created");
        Ok(handle)
    }

    async fn send_chat(&self, handle: &ChatHandle, text: &str) -> Result<String, SproutError> {
        // Snapshot the session so the lock is not held across the request.
        let state = self
            .chats
            .lock()
            .await
            .get(handle)
            .cloned()
            .ok_or_else(|| SproutError::Internal(format!("unknown chat session {handle}")))?;

        let user_turn = Content::user(vec![Part::text(text)]);
        let mut contents = state.history;
        contents.push(user_turn.clone());

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::instruction(state.system_instruction)),
        };

        let response = self.client.generate_content(&request).await?;
        let reply = response
            .text()
            .ok_or_else(|| SproutError::provider(format!("Gemini {}", response.empty_reason())))?;

        // History only grows on success, so a failed turn is never replayed.
        if let Some(state) = self.chats.lock().await.get_mut(handle) {
            state.history.push(user_turn);
            state.history.push(Content::model_text(reply.clone()));
            debug!(chat = %handle, turns = state.history.len(), "chat history updated");
        }

        Ok(reply)
    }

    async fn close_chat(&self, handle: &ChatHandle) -> Result<(), SproutError> {
        if self.chats.lock().await.remove(handle).is_some() {
            debug!(chat = %handle, "chat session closed");
        }
        Ok(())
    }
}

/// Resolves the API key from config, falling back to the environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, SproutError> {
    resolve_api_key_with(config_key, std::env::var(API_KEY_ENV).ok())
}

fn resolve_api_key_with(
    config_key: &Option<String>,
    env_key: Option<String>,
) -> Result<String, SproutError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.clone());
    }

    env_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
        SproutError::Config(format!(
            "Gemini API key not found. Set gemini.api_key in config or {API_KEY_ENV} environment variable."
        ))
    })
}
