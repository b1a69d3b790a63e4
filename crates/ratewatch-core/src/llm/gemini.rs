//! Client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{ExtractionPayload, LlmClient};
use crate::error::{ExtractionError, RateWatchError, Result, truncate_body};
use crate::models::config::ExtractionConfig;

/// Longest response body carried in an error.
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn from_config(config: &ExtractionConfig, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RateWatchError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_headers(&self) -> std::result::Result<HeaderMap, ExtractionError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.config.api_key).map_err(|_| {
            ExtractionError::Transport {
                status: None,
                body: "API key contains characters not allowed in a header".to_string(),
            }
        })?;
        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn build_payload(&self, payload: &ExtractionPayload, prompt: &str) -> Value {
        let mut parts = Vec::with_capacity(2);
        if let ExtractionPayload::Vision { mime, data_base64 } = payload {
            parts.push(json!({
                "inlineData": {
                    "mimeType": mime.as_str(),
                    "data": data_base64,
                }
            }));
        }
        parts.push(json!({ "text": prompt }));

        json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_output_tokens,
            }
        })
    }

    /// Concatenated text of the first candidate, or why there is none.
    fn parse_response(body: &Value) -> std::result::Result<String, ExtractionError> {
        let candidate = body
            .get("candidates")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first());

        let text: String = candidate
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|v| v.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        let finish_reason = candidate
            .and_then(|c| c.get("finishReason"))
            .or_else(|| body.get("promptFeedback").and_then(|f| f.get("blockReason")))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let detail = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Err(ExtractionError::EmptyResponse {
            finish_reason,
            detail,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(
        &self,
        payload: &ExtractionPayload,
        prompt: &str,
    ) -> std::result::Result<String, ExtractionError> {
        let headers = self.build_headers()?;
        let body = self.build_payload(payload, prompt);

        debug!(model = %self.config.model, mode = payload.mode(), prompt_chars = prompt.len(), "calling extraction endpoint");

        let response = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::Transport {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ExtractionError::Transport {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "extraction endpoint returned an error");
            return Err(ExtractionError::Transport {
                status: Some(status.as_u16()),
                body: truncate_body(&text, ERROR_BODY_LIMIT),
            });
        }

        let envelope: Value = serde_json::from_str(&text).map_err(|e| {
            ExtractionError::EmptyResponse {
                finish_reason: None,
                detail: Some(format!("response envelope is not JSON: {e}")),
            }
        })?;

        let reply = Self::parse_response(&envelope)?;
        debug!(reply_chars = reply.len(), "extraction endpoint replied");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::MimeType;
    use mockito::{Matcher, Server};

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn client(server: &Server) -> GeminiClient {
        let mut config = GeminiConfig::from_config(&ExtractionConfig::default(), "test-key");
        config.base_url = format!("{}/v1beta", server.url());
        GeminiClient::new(config).unwrap()
    }

    fn vision() -> ExtractionPayload {
        ExtractionPayload::Vision {
            mime: MimeType::Png,
            data_base64: "iVBORw0KGgo=".into(),
        }
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "maxOutputTokens": 3000 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "```json\n{\"Bank Name\":" }, { "text": "\"BBS Bank\"}\n```" }] },
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let reply = client(&server).generate(&vision(), "prompt").await.unwrap();
        assert_eq!(reply, "```json\n{\"Bank Name\":\"BBS Bank\"}\n```");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_vision_payload_carries_inline_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""inlineData""#.into()),
                Matcher::Regex(r#""mimeType":"image/png""#.into()),
                Matcher::Regex(r#""data":"iVBORw0KGgo=""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"{}"}]}}]}"#)
            .create_async()
            .await;

        client(&server).generate(&vision(), "prompt").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_is_transport_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(503)
            .with_body("x".repeat(2000))
            .create_async()
            .await;

        let err = client(&server).generate(&vision(), "prompt").await.unwrap_err();
        match err {
            ExtractionError::Transport { status, body } => {
                assert_eq!(status, Some(503));
                assert!(body.chars().count() <= ERROR_BODY_LIMIT + 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_text_reports_finish_reason() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
            .create_async()
            .await;

        let err = client(&server).generate(&ExtractionPayload::Text, "prompt").await.unwrap_err();
        match err {
            ExtractionError::EmptyResponse { finish_reason, .. } => {
                assert_eq!(finish_reason.as_deref(), Some("SAFETY"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_and_error_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"OTHER"},"error":{"message":"quota"}}"#)
            .create_async()
            .await;

        let err = client(&server).generate(&vision(), "prompt").await.unwrap_err();
        match err {
            ExtractionError::EmptyResponse {
                finish_reason,
                detail,
            } => {
                assert_eq!(finish_reason.as_deref(), Some("OTHER"));
                assert_eq!(detail.as_deref(), Some("quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let mut config = GeminiConfig::from_config(&ExtractionConfig::default(), "test-key");
        config.base_url = "http://127.0.0.1:1".into();
        let client = GeminiClient::new(config).unwrap();

        let err = client.generate(&vision(), "prompt").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Transport { status: None, .. }));
    }
}
