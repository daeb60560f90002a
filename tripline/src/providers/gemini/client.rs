//! Google Gemini API client implementation.

use super::completion::CompletionModel;
use crate::error::{Error, Result};
use crate::providers::common::ApiClient;
use crate::providers::config::HttpClientConfig;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

/// Default Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Header carrying the Gemini API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client for creating completion models.
///
/// # Example
///
/// ```rust,ignore
/// use tripline::providers::gemini::GeminiClient;
///
/// let client = GeminiClient::new("AIza...")?;
/// let flash = client.completion_model("gemini-2.0-flash");
/// ```
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Arc<str>,
    base_url: Arc<str>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    /// Create a completion model with the specified model ID.
    #[must_use]
    pub fn completion_model(&self, model_id: impl Into<String>) -> CompletionModel {
        CompletionModel::new(self.clone(), model_id)
    }
}

impl ApiClient for GeminiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);

        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Builder for [`GeminiClient`].
#[derive(Debug, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    http: HttpClientConfig,
}

impl GeminiClientBuilder {
    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL (proxies, test servers).
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
    /// Returns [`Error::Config`] if no API key was set, or an error if the
    /// HTTP client fails to build.
    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config("Gemini API key is required"))?;
        let base_url = self
            .base_url
            .map_or_else(|| GEMINI_API_BASE_URL.to_owned(), |url| url.trim_end_matches('/').to_owned());

        Ok(GeminiClient {
            http_client: self.http.build_client()?,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::builder()
            .api_key("test-key")
            .base_url("https://custom.api.com/")
            .timeout_secs(30)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://custom.api.com");
        assert_eq!(
            client.auth_headers().get("x-goog-api-key").unwrap(),
            "test-key"
        );
    }

    #[test]
    fn test_default_base_url() {
        let client = GeminiClient::new("test-key").unwrap();
        assert_eq!(client.base_url(), GEMINI_API_BASE_URL);
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = GeminiClient::builder().build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::new("super-secret").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
