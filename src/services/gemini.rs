// src/services/gemini.rs
use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

pub const NO_RESPONSE_PLACEHOLDER: &str = "No response from Gemini";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Gemini API error {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

// ---- wire types ----

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// One content entry holding `prompt` as its single text part.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt.to_string()) }],
            }],
        }
    }
}

/// Raw success payload. Kept untyped so any JSON shape decodes and a
/// missing reply path falls back to the placeholder instead of failing.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct GenerateContentResponse(Value);

impl GenerateContentResponse {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Text at `candidates[0].content.parts[0].text`, if it is a non-empty string.
    pub fn reply_text(&self) -> Option<&str> {
        self.0
            .pointer("/candidates/0/content/parts/0/text")?
            .as_str()
            .filter(|t| !t.is_empty())
    }

    pub fn reply_or_placeholder(&self) -> String {
        self.reply_text().unwrap_or(NO_RESPONSE_PLACEHOLDER).to_string()
    }
}

// ---- client ----

#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, UpstreamError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, &config.gemini_base_url, &config.gemini_model, &config.api_key)
    }

    /// Endpoint without the key; the key goes in as a query parameter.
    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, UpstreamError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(UpstreamError::Rejected { status, body });
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_wraps_prompt_verbatim() {
        let req = GenerateContentRequest::from_prompt("  hi  ");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"contents": [{"parts": [{"text": "  hi  "}]}]})
        );
    }

    #[test]
    fn extracts_first_candidate_text() {
        let resp = parse(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hi there"}, {"text": "ignored"}], "role": "model"}},
                {"content": {"parts": [{"text": "second"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 7}
        }));
        assert_eq!(resp.reply_text(), Some("Hi there"));
    }

    #[test]
    fn missing_path_falls_back_to_placeholder() {
        for value in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": 42}]}}]}),
            json!({"candidates": null}),
            json!({"candidates": [null]}),
            json!({"candidates": [{"content": null}]}),
            json!({"candidates": [{"content": {"parts": null}}]}),
            json!({"candidates": [{"content": {"parts": [null]}}]}),
            json!({"candidates": "oops"}),
            json!(null),
            json!([]),
            json!("text"),
        ] {
            assert_eq!(parse(value).reply_or_placeholder(), NO_RESPONSE_PLACEHOLDER);
        }
    }

    #[test]
    fn endpoint_uses_model() {
        let client = GeminiClient::new(Client::new(), "http://localhost:1/", "gemini-1.5-flash", "k");
        assert_eq!(
            client.endpoint(),
            "http://localhost:1/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(!format!("{client:?}").contains("\"k\""));
    }
}
