//! Ollama API client implementation.
//!
//! Ollama runs locally and needs no API key, which makes it the offline
//! option for running the triage agents.

use super::completion::CompletionModel;
use crate::error::Result;
use crate::providers::common::ApiClient;
use crate::providers::config::HttpClientConfig;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::sync::Arc;

/// Default Ollama API base URL (local server).
pub const OLLAMA_API_BASE_URL: &str = "http://localhost:11434";

/// Ollama API client for creating completion models.
///
/// # Example
///
/// ```rust,ignore
/// use tripline::providers::ollama::OllamaClient;
///
/// let client = OllamaClient::builder()
///     .base_url("http://192.168.1.100:11434")
///     .build()?;
///
/// let model = client.completion_model("llama3.2");
/// ```
#[derive(Clone)]
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: Arc<str>,
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OllamaClient {
    /// Create a new Ollama client connected to `http://localhost:11434`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> OllamaClientBuilder {
        OllamaClientBuilder::default()
    }

    /// Create a completion model with the specified model ID
    /// (e.g., "llama3.2", "qwen2.5", "mistral").
    #[must_use]
    pub fn completion_model(&self, model_id: impl Into<String>) -> CompletionModel {
        CompletionModel::new(self.clone(), model_id)
    }
}

impl ApiClient for OllamaClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Builder for [`OllamaClient`].
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    http: HttpClientConfig,
}

impl OllamaClientBuilder {
    /// Set a custom base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn timeout_secs(mut self, timeout: u64) -> Self {
        self.http = self.http.with_timeout_secs(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn build(self) -> Result<OllamaClient> {
        let base_url = self
            .base_url
            .map_or_else(|| OLLAMA_API_BASE_URL.to_owned(), |url| url.trim_end_matches('/').to_owned());

        Ok(OllamaClient {
            http_client: self.http.build_client()?,
            base_url: base_url.into(),
        })
    }
}
