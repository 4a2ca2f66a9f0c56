// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the parser, the workflows, and the provider adapters.

use std::fmt;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::SproutError;

/// An image encoded for transfer to the remote service.
///
/// `data` is the base64 text of the raw bytes; the browser-style handle is
/// available through [`ImageData::to_data_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// Media type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImageData {
    /// Builds an image from raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Reads an image file and encodes it.
    ///
    /// The media type comes from the file extension; anything that is not a
    /// known image type is rejected before the file is read.
    pub async fn from_path(path: &Path) -> Result<Self, SproutError> {
        let mime_type = image_mime_type(path).ok_or_else(|| {
            SproutError::UnsupportedMedia(format!(
                "{} does not look like an image (expected png, jpeg, webp, gif, heic or heif)",
                path.display()
            ))
        })?;

        let bytes = tokio::fs::read(path).await.map_err(|source| SproutError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(path = %path.display(), mime_type, size = bytes.len(), "image read");
        Ok(Self::from_bytes(mime_type, &bytes))
    }

    /// Returns the `data:` URL form of this image.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Maps a file extension to an image media type.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Care instructions for an identified plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareInstructions {
    pub sunlight: String,
    pub watering: String,
    pub soil: String,
    pub fertilizer: String,
}

/// A successfully identified plant.
///
/// Optional fields always hold a string: placeholders are substituted when
/// the record is built, never at display time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub common_name: String,
    /// Unique key inside a garden collection.
    pub scientific_name: String,
    pub description: String,
    pub care: CareInstructions,
    pub toxicity: String,
    pub common_pests: String,
    /// The image this identification was derived from.
    pub source_image: ImageData,
}

impl PlantRecord {
    /// Renders the record in the labeled markdown layout the identification
    /// prompt asks for. Parsing the output yields an equal record.
    pub fn to_markdown(&self) -> String {
        format!(
            "- **Common Name:** {}\n\
             - **Scientific Name:** {}\n\
             - **Description:** {}\n\
             - **Care Instructions:**\n  \
               - **Sunlight:** {}\n  \
               - **Watering:** {}\n  \
               - **Soil:** {}\n  \
               - **Fertilizer:** {}\n\
             - **Additional Details:**\n  \
               - **Toxicity:** {}\n  \
               - **Common Pests:** {}\n",
            self.common_name,
            self.scientific_name,
            self.description,
            self.care.sunlight,
            self.care.watering,
            self.care.soil,
            self.care.fertilizer,
            self.toxicity,
            self.common_pests,
        )
    }
}

/// Handle for a stateful chat session held by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatHandle(pub String);

impl ChatHandle {
    /// Generates a fresh random handle.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ChatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who authored a chat turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One turn of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
    /// True while the bot reply for this turn is outstanding.
    pub pending: bool,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            pending: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            pending: false,
        }
    }

    /// A placeholder bot turn awaiting its reply.
    pub fn pending_bot() -> Self {
        Self {
            sender: Sender::Bot,
            text: String::new(),
            pending: true,
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(image_mime_type(Path::new("a/fern.PNG")), Some("image/png"));
        assert_eq!(image_mime_type(Path::new("ficus.jpg")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("ficus.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("notes.txt")), None);
        assert_eq!(image_mime_type(Path::new("no_extension")), None);
    }

    #[test]
    fn data_url_carries_mime_and_payload() {
        let image = ImageData::from_bytes("image/png", b"leaf");
        assert_eq!(image.data, "bGVhZg==");
        assert_eq!(image.to_data_url(), "data:image/png;base64,bGVhZg==");
    }

    #[tokio::test]
    async fn from_path_reads_and_encodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monstera.webp");
        std::fs::write(&path, b"leaf").unwrap();

        let image = ImageData::from_path(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.data, "bGVhZg==");
    }

    #[tokio::test]
    async fn from_path_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not an image").unwrap();

        let err = ImageData::from_path(&path).await.unwrap_err();
        assert!(matches!(err, SproutError::UnsupportedMedia(_)), "got: {err}");
    }

    #[tokio::test]
    async fn from_path_reports_missing_file() {
        let err = ImageData::from_path(Path::new("/nonexistent/fern.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, SproutError::Io { .. }), "got: {err}");
    }

    #[test]
    fn sender_display_round_trip() {
        use std::str::FromStr;
        for sender in [Sender::User, Sender::Bot] {
            let parsed = Sender::from_str(&sender.to_string()).expect("should parse back");
            assert_eq!(sender, parsed);
        }
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn pending_turn_is_an_empty_bot_turn() {
        let turn = ChatTurn::pending_bot();
        assert_eq!(turn.sender, Sender::Bot);
        assert!(turn.pending);
        assert!(turn.text.is_empty());
    }
}
