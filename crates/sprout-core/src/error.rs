// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Sprout.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum SproutError {
    /// Configuration errors (missing credential, invalid header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote AI provider errors (network failure, non-success status, empty reply).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The selected file is not an image media type Sprout can send.
    #[error("unsupported media: {0}")]
    UnsupportedMedia(String),

    /// Reading a local file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SproutError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        SproutError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for failures of the remote service or the transport to it.
    pub fn is_transport(&self) -> bool {
        matches!(self, SproutError::Provider { .. })
    }
}
