// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plant identification state machine.
//!
//! Each identification moves through `Idle -> Submitted -> Awaiting` and ends
//! in one of four terminal states. Selecting a new image is always allowed and
//! bumps the generation; only a reply carrying the current generation may
//! commit its terminal state.

use std::path::Path;
use std::sync::Arc;

use sprout_core::{ImageData, PlantRecord, ProviderAdapter, SproutError};
use sprout_garden::{parser, refusal_phrase};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Shown when the remote call fails.
pub const ANALYSIS_ERROR_MESSAGE: &str = "An error occurred during analysis. Please try again.";

/// Shown when the reply does not contain a usable plant record.
pub const UNEXPECTED_FORMAT_MESSAGE: &str =
    "Could not identify the plant from the image. The response might be in an unexpected format.";

/// States of the identification workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifyState {
    /// Nothing selected yet.
    Idle,
    /// An image was selected; the previous result is cleared.
    Submitted,
    /// The image is encoded and the remote call is in flight.
    Awaiting,
    /// The reply parsed into a plant record.
    Success(PlantRecord),
    /// The reply says the image is not an identifiable plant. Carries the raw text.
    NotAPlant(String),
    /// The reply could not be parsed.
    ParseFailed(String),
    /// The remote call failed.
    NetworkError(String),
}

impl IdentifyState {
    /// True for the four result states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IdentifyState::Success(_)
                | IdentifyState::NotAPlant(_)
                | IdentifyState::ParseFailed(_)
                | IdentifyState::NetworkError(_)
        )
    }

    /// The identified plant, if this is a success.
    pub fn record(&self) -> Option<&PlantRecord> {
        match self {
            IdentifyState::Success(record) => Some(record),
            _ => None,
        }
    }

    /// The user-facing message of a non-success terminal state.
    pub fn message(&self) -> Option<&str> {
        match self {
            IdentifyState::NotAPlant(m)
            | IdentifyState::ParseFailed(m)
            | IdentifyState::NetworkError(m) => Some(m),
            _ => None,
        }
    }
}

impl std::fmt::Display for IdentifyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifyState::Idle => write!(f, "idle"),
            IdentifyState::Submitted => write!(f, "submitted"),
            IdentifyState::Awaiting => write!(f, "awaiting"),
            IdentifyState::Success(_) => write!(f, "success"),
            IdentifyState::NotAPlant(_) => write!(f, "not-a-plant"),
            IdentifyState::ParseFailed(_) => write!(f, "parse-failed"),
            IdentifyState::NetworkError(_) => write!(f, "network-error"),
        }
    }
}

/// Monotonic request token. Bumped on every new selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Slot {
    generation: Generation,
    state: IdentifyState,
}

/// Drives plant identification against a provider.
///
/// Cloning shares the same state; callers may run identifications from
/// several tasks and the latest selection always wins.
#[derive(Clone)]
pub struct IdentificationWorkflow {
    provider: Arc<dyn ProviderAdapter>,
    slot: Arc<Mutex<Slot>>,
}

impl IdentificationWorkflow {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            provider,
            slot: Arc::new(Mutex::new(Slot {
                generation: Generation(0),
                state: IdentifyState::Idle,
            })),
        }
    }

    /// Current state snapshot.
    pub async fn state(&self) -> IdentifyState {
        self.slot.lock().await.state.clone()
    }

    /// Current generation.
    pub async fn generation(&self) -> Generation {
        self.slot.lock().await.generation
    }

    /// Registers a new selection: clears any previous result and
    /// supersedes whatever is in flight.
    pub async fn submit(&self) -> Generation {
        let mut slot = self.slot.lock().await;
        slot.generation = Generation(slot.generation.0 + 1);
        slot.state = IdentifyState::Submitted;
        debug!(generation = %slot.generation, "identification submitted");
        slot.generation
    }

    /// Identifies an already-encoded image.
    ///
    /// Returns the terminal state this call committed, or `None` if a newer
    /// selection superseded it.
    pub async fn identify_image(&self, image: ImageData) -> Option<IdentifyState> {
        let generation = self.submit().await;
        self.run(generation, image).await
    }

    /// Reads and identifies an image file.
    ///
    /// A file that cannot be read, or that is not a supported image type,
    /// returns the workflow to `Idle` and the error to the caller.
    pub async fn identify_file(&self, path: &Path) -> Result<Option<IdentifyState>, SproutError> {
        let generation = self.submit().await;
        match ImageData::from_path(path).await {
            Ok(image) => Ok(self.run(generation, image).await),
            Err(e) => {
                let mut slot = self.slot.lock().await;
                if slot.generation == generation {
                    slot.state = IdentifyState::Idle;
                }
                warn!(path = %path.display(), error = %e, "could not load image");
                Err(e)
            }
        }
    }

    /// Runs the remote call for `generation` and commits the outcome if it
    /// is still current.
    pub async fn run(&self, generation: Generation, image: ImageData) -> Option<IdentifyState> {
        {
            let mut slot = self.slot.lock().await;
            if slot.generation != generation {
                debug!(%generation, current = %slot.generation, "superseded before sending");
                return None;
            }
            slot.state = IdentifyState::Awaiting;
        }

        let reply = self.provider.identify(&image).await;
        let outcome = classify(reply, image);

        let mut slot = self.slot.lock().await;
        if slot.generation != generation {
            debug!(
                %generation,
                current = %slot.generation,
                outcome = %outcome,
                "discarding stale identification result"
            );
            return None;
        }
        info!(%generation, outcome = %outcome, "identification finished");
        slot.state = outcome.clone();
        Some(outcome)
    }
}

/// Maps a remote reply onto a terminal state.
pub fn classify(reply: Result<String, SproutError>, image: ImageData) -> IdentifyState {
    let text = match reply {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "identification request failed");
            return IdentifyState::NetworkError(ANALYSIS_ERROR_MESSAGE.to_string());
        }
    };

    if let Some(phrase) = refusal_phrase(&text) {
        debug!(phrase, "reply declined to identify a plant");
        return IdentifyState::NotAPlant(text);
    }

    match parser::parse(&text, image) {
        Ok(record) => IdentifyState::Success(record),
        Err(e) => {
            warn!(error = %e, "identification reply did not parse");
            IdentifyState::ParseFailed(UNEXPECTED_FORMAT_MESSAGE.to_string())
        }
    }
}
