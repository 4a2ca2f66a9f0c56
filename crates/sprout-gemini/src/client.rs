// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` REST API.
//!
//! [`GeminiClient`] builds authenticated requests and maps non-success
//! statuses onto [`SproutError::Provider`]. Requests are sent once; a failed
//! call is surfaced to the caller, who decides whether to try again.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use sprout_core::SproutError;
use tracing::debug;

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, ModelInfo};

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key, sent as the `x-goog-api-key` header
    /// * `model` - Model identifier (e.g., "gemini-2.5-flash")
    /// * `base_url` - API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `timeout` - Optional whole-request timeout
    pub fn new(
        api_key: &str,
        model: String,
        base_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, SproutError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| SproutError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SproutError::Provider {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    /// Sends a `generateContent` request and returns the parsed response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, SproutError> {
        let url = format!("{}:generateContent", self.model_url());
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SproutError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");

        let body = response.text().await.map_err(|e| SproutError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| SproutError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Fetches metadata for the configured model. Used as a reachability
    /// and credential check.
    pub async fn get_model(&self) -> Result<ModelInfo, SproutError> {
        let response = self
            .client
            .get(self.model_url())
            .send()
            .await
            .map_err(|e| SproutError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SproutError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| SproutError::Provider {
            message: format!("failed to parse model info: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Maps a non-success response onto a provider error, preferring the
/// structured Gemini error envelope when the body carries one.
fn api_error(status: reqwest::StatusCode, body: &str) -> SproutError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) if !api_err.error.status.is_empty() => format!(
            "Gemini API error ({}): {}",
            api_err.error.status, api_err.error.message
        ),
        Ok(api_err) => format!("Gemini API error ({status}): {}", api_err.error.message),
        Err(_) => format!("API returned {status}: {body}"),
    };
    SproutError::provider(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Content, Part};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            "test-key",
            "gemini-2.5-flash".into(),
            server.uri(),
            None,
        )
        .unwrap()
    }

    fn text_request(text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(text)])],
            system_instruction: None,
        }
    }

    #[test]
    fn client_construction() {
        let client = GeminiClient::new(
            "key",
            "gemini-2.5-flash".into(),
            "https://example.test/v1beta/".into(),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(client.model_url(), "https://example.test/v1beta/models/gemini-2.5-flash");
    }

    #[test]
    fn invalid_api_key_header_is_config_error() {
        let err = GeminiClient::new("bad\nkey", "m".into(), "http://x".into(), None).unwrap_err();
        assert!(matches!(err, SproutError::Config(_)));
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Water weekly."}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.generate_content(&text_request("Fern tips?")).await.unwrap();
        assert_eq!(response.text().as_deref(), Some("Water weekly."));
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate_content(&text_request("hi")).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("UNAVAILABLE"), "got: {msg}");
        assert!(msg.contains("overloaded"), "got: {msg}");
    }

    #[tokio::test]
    async fn unstructured_error_body_is_reported_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate_content(&text_request("hi")).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("502"), "got: {msg}");
        assert!(msg.contains("bad gateway"), "got: {msg}");
    }

    #[tokio::test]
    async fn malformed_success_body_is_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate_content(&text_request("hi")).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn get_model_reads_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models/gemini-2.5-flash"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "models/gemini-2.5-flash",
                "displayName": "Gemini 2.5 Flash"
            })))
            .mount(&server)
            .await;

        let info = client_for(&server).get_model().await.unwrap();
        assert_eq!(info.name, "models/gemini-2.5-flash");
        assert_eq!(info.display_name.as_deref(), Some("Gemini 2.5 Flash"));
    }

    #[tokio::test]
    async fn get_model_rejected_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).get_model().await.unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }
}
