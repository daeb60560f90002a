//! Ollama Generate API implementation.

use super::client::OllamaClient;
use crate::error::{LlmError, Result};
use crate::providers::common::{
    ApiClient, Completion, CompletionService, TokenUsage, saturating_u32,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Ollama completion model, backed by `POST /api/generate`.
#[derive(Clone)]
pub struct CompletionModel {
    client: OllamaClient,
    model_id: String,
    /// Default number of tokens to predict.
    pub num_predict: Option<u32>,
    /// Keep model loaded in memory.
    pub keep_alive: Option<String>,
}

impl std::fmt::Debug for CompletionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionModel")
            .field("model_id", &self.model_id)
            .field("num_predict", &self.num_predict)
            .field("keep_alive", &self.keep_alive)
            .finish_non_exhaustive()
    }
}

impl CompletionModel {
    pub(crate) fn new(client: OllamaClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            num_predict: None,
            keep_alive: None,
        }
    }

    /// Set the number of tokens to predict.
    #[must_use]
    pub const fn with_num_predict(mut self, num_predict: u32) -> Self {
        self.num_predict = Some(num_predict);
        self
    }

    /// Set `keep_alive` duration (e.g., "5m", "1h", "-1" for indefinite).
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model_id,
            "prompt": prompt,
            "stream": false
        });

        if let Some(num_predict) = self.num_predict {
            body["options"] = json!({ "num_predict": num_predict });
        }

        if let Some(keep_alive) = &self.keep_alive {
            body["keep_alive"] = json!(keep_alive);
        }

        body
    }

    fn parse_response(json: &Value) -> Result<Completion> {
        let text = json["response"].as_str().ok_or_else(|| {
            LlmError::response_format("string field `response`", json.to_string())
                .with_provider("ollama")
        })?;

        let mut completion = Completion::new(text);

        if json.get("prompt_eval_count").is_some() {
            completion = completion.with_token_usage(TokenUsage::new(
                saturating_u32(json["prompt_eval_count"].as_u64().unwrap_or(0)),
                saturating_u32(json["eval_count"].as_u64().unwrap_or(0)),
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
        "ollama"
    }

    #[instrument(skip(self, prompt), fields(model = %self.model_id))]
    async fn generate(&self, prompt: &str) -> Result<Completion> {
        let body = self.build_request_body(prompt);
        let url = format!("{}/api/generate", self.client.base_url());

        debug!("Sending request to Ollama API");

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
            return Err(LlmError::from_status("ollama", status, error_text).into());
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        debug!(response = %json, "Ollama API response");
        Self::parse_response(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let model = OllamaClient::new()
            .unwrap()
            .completion_model("llama3.2")
            .with_num_predict(32)
            .with_keep_alive("5m");
        let body = model.build_request_body("hello");
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["prompt"], "hello");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 32);
        assert_eq!(body["keep_alive"], "5m");
    }

    #[test]
    fn test_parse_response_with_usage() {
        let json = json!({ "response": "general", "prompt_eval_count": 20, "eval_count": 1 });
        let completion = CompletionModel::parse_response(&json).unwrap();
        assert_eq!(completion.text, "general");
        assert_eq!(completion.token_usage, Some(TokenUsage::new(20, 1)));
    }

    #[test]
    fn test_parse_response_missing_text() {
        let err = CompletionModel::parse_response(&json!({ "done": true })).unwrap_err();
        assert!(err.to_string().contains("[ollama]"));
    }
}
