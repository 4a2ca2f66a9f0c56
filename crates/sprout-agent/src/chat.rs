// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gardening chat session.
//!
//! The transcript opens with a greeting from the bot. At most one reply is
//! outstanding at a time: a send appends the user's turn plus a pending bot
//! turn, and the pending turn is later replaced by the reply or by a fixed
//! apology.

use std::sync::Arc;

use sprout_core::{ChatHandle, ChatTurn, ProviderAdapter, SproutError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Replaces the pending turn when the remote call fails.
pub const CONNECTION_APOLOGY: &str =
    "Sorry, I'm having trouble connecting. Please try again later.";

/// Why a send was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was empty or whitespace.
    Empty,
    /// A previous reply is still outstanding.
    Pending,
}

/// Result of [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was appended.
    Rejected(RejectReason),
    /// The pending turn was replaced by this reply.
    Replied(String),
    /// The pending turn was replaced by [`CONNECTION_APOLOGY`].
    Failed,
}

/// One gardening conversation.
///
/// Clones share the same transcript and remote session, so a caller can
/// spawn [`send`](Self::send) and keep reading the transcript meanwhile.
#[derive(Clone)]
pub struct ChatSession {
    provider: Arc<dyn ProviderAdapter>,
    handle: ChatHandle,
    transcript: Arc<Mutex<Vec<ChatTurn>>>,
}

impl ChatSession {
    /// Opens the remote session and seeds the transcript with `greeting`.
    pub async fn start(
        provider: Arc<dyn ProviderAdapter>,
        system_instruction: &str,
        greeting: &str,
    ) -> Result<Self, SproutError> {
        let handle = provider.create_chat(system_instruction).await?;
        info!(chat = %handle, provider = provider.name(), "chat session started");
        Ok(Self {
            provider,
            handle,
            transcript: Arc::new(Mutex::new(vec![ChatTurn::bot(greeting)])),
        })
    }

    pub fn handle(&self) -> &ChatHandle {
        &self.handle
    }

    /// Snapshot of the transcript.
    pub async fn transcript(&self) -> Vec<ChatTurn> {
        self.transcript.lock().await.clone()
    }

    /// True while a reply is outstanding.
    pub async fn is_pending(&self) -> bool {
        self.transcript.lock().await.iter().any(|t| t.pending)
    }

    /// Sends one user message and waits for the reply.
    ///
    /// Must be called within a tokio runtime.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let slot = {
            let mut transcript = self.transcript.lock().await;
            if text.trim().is_empty() {
                debug!("ignoring empty chat message");
                return SendOutcome::Rejected(RejectReason::Empty);
            }
            if transcript.iter().any(|t| t.pending) {
                debug!("ignoring chat message while a reply is pending");
                return SendOutcome::Rejected(RejectReason::Pending);
            }
            transcript.push(ChatTurn::user(text));
            transcript.push(ChatTurn::pending_bot());
            transcript.len() - 1
        };

        // The exchange runs on its own task, so dropping or aborting this
        // future still resolves the pending turn once the reply arrives.
        let provider = Arc::clone(&self.provider);
        let handle = self.handle.clone();
        let transcript = Arc::clone(&self.transcript);
        let message = text.to_owned();
        let exchange = tokio::spawn(async move {
            let (turn, outcome) = match provider.send_chat(&handle, &message).await {
                Ok(reply) => (ChatTurn::bot(reply.clone()), SendOutcome::Replied(reply)),
                Err(e) => {
                    warn!(chat = %handle, error = %e, "chat request failed");
                    (ChatTurn::bot(CONNECTION_APOLOGY), SendOutcome::Failed)
                }
            };
            transcript.lock().await[slot] = turn;
            outcome
        });

        match exchange.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(chat = %self.handle, error = %e, "chat exchange did not complete");
                self.transcript.lock().await[slot] = ChatTurn::bot(CONNECTION_APOLOGY);
                SendOutcome::Failed
            }
        }
    }

    /// Ends the remote session. The transcript stays readable.
    pub async fn close(&self) -> Result<(), SproutError> {
        self.provider.close_chat(&self.handle).await?;
        info!(chat = %self.handle, "chat session closed");
        Ok(())
    }
}
