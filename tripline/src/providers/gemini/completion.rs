//! Gemini `generateContent` API implementation.

use super::client::GeminiClient;
use crate::error::{LlmError, Result};
use crate::providers::common::{
    ApiClient, Completion, CompletionService, TokenUsage, saturating_u32,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Gemini completion model.
#[derive(Clone)]
pub struct CompletionModel {
    client: GeminiClient,
    model_id: String,
    /// Sampling temperature sent with every request.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for CompletionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionModel")
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish_non_exhaustive()
    }
}

impl CompletionModel {
    pub(crate) fn new(client: GeminiClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens.
    #[must_use]
    pub const fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        let mut config = serde_json::Map::new();
        if let Some(temperature) = self.temperature {
            config.insert("temperature".to_owned(), json!(temperature));
        }
        if let Some(max) = self.max_output_tokens {
            config.insert("maxOutputTokens".to_owned(), json!(max));
        }
        if !config.is_empty() {
            body["generationConfig"] = Value::Object(config);
        }

        body
    }

    /// Parse the API response into a [`Completion`].
    ///
    /// The text is the concatenation of every text part of the first candidate.
    fn parse_response(json: &Value) -> Result<Completion> {
        let parts = json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                let reason = json["promptFeedback"]["blockReason"]
                    .as_str()
                    .map_or_else(|| "no candidates".to_owned(), |r| format!("prompt blocked: {r}"));
                LlmError::response_format("candidate content parts", reason).with_provider("gemini")
            })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        let mut completion = Completion::new(text);

        let usage = &json["usageMetadata"];
        if usage.is_object() {
            completion = completion.with_token_usage(TokenUsage::new(
                saturating_u32(usage["promptTokenCount"].as_u64().unwrap_or(0)),
                saturating_u32(usage["candidatesTokenCount"].as_u64().unwrap_or(0)),
            ));
        }

        Ok(completion)
    }
}

#[async_trait]
impl CompletionService for CompletionModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn provider(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, prompt), fields(model = %self.model_id))]
    async fn generate(&self, prompt: &str) -> Result<Completion> {
        let body = self.build_request_body(prompt);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.client.base_url(),
            self.model_id
        );

        debug!(prompt_len = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .http_client()
            .post(&url)
            .headers(self.client.auth_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("gemini", status, error_text).into());
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        debug!(response = %json, "Gemini API response");
        Self::parse_response(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> CompletionModel {
        GeminiClient::new("test-key")
            .unwrap()
            .completion_model("gemini-2.0-flash")
    }

    #[test]
    fn test_request_body_contains_prompt() {
        let body = model().build_request_body("What is 2+2?");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "What is 2+2?");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_request_body_generation_config() {
        let body = model()
            .with_temperature(0.0)
            .with_max_output_tokens(64)
            .build_request_body("hi");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 64);
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let json = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Yes, " }, { "text": "math" }] }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
        });
        let completion = CompletionModel::parse_response(&json).unwrap();
        assert_eq!(completion.text, "Yes, math");
        assert_eq!(completion.token_usage, Some(TokenUsage::new(12, 3)));
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let json = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = CompletionModel::parse_response(&json).unwrap_err();
        assert!(err.to_string().contains("prompt blocked: SAFETY"));
    }
}
