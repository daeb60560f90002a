//! Process-level settings for choosing and building a completion service.
//!
//! Settings are assembled once at the process boundary (the CLI fills them
//! from flags and environment variables) and passed explicitly into
//! [`Settings::build_service`]. Nothing in the library reads the environment.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{CompletionService, DEFAULT_TIMEOUT_SECS, GeminiClient, OllamaClient};

/// Which completion provider to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Google Gemini.
    #[default]
    Gemini,
    /// A local Ollama server.
    Ollama,
}

impl ProviderKind {
    /// Model used when none is configured.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::Ollama => "llama3.2",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => f.write_str("gemini"),
            Self::Ollama => f.write_str("ollama"),
        }
    }
}

/// Settings for the completion service shared by the router, agents and
/// guardrails.
#[derive(Clone)]
pub struct Settings {
    /// Provider to use.
    pub provider: ProviderKind,
    /// Model identifier.
    pub model: String,
    /// API key; required for Gemini, ignored by Ollama.
    pub api_key: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_provider(ProviderKind::default())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Settings for `provider` with its default model.
    #[must_use]
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: provider.default_model().to_owned(),
            api_key: None,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL override.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Check that the settings can build a service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty model name, a zero timeout, or a
    /// missing Gemini API key.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::config("model name must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout must be at least one second"));
        }
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        if self.provider == ProviderKind::Gemini && !has_key {
            return Err(Error::config(
                "GEMINI_API_KEY is required for the gemini provider",
            ));
        }
        Ok(())
    }

    /// Build the completion service described by these settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if validation fails, or an error if the HTTP
    /// client cannot be built.
    pub fn build_service(&self) -> Result<Arc<dyn CompletionService>> {
        self.validate()?;

        let service: Arc<dyn CompletionService> = match self.provider {
            ProviderKind::Gemini => {
                let mut builder = GeminiClient::builder()
                    .api_key(self.api_key.clone().unwrap_or_default())
                    .timeout_secs(self.timeout_secs);
                if let Some(url) = &self.base_url {
                    builder = builder.base_url(url);
                }
                Arc::new(builder.build()?.completion_model(&self.model))
            }
            ProviderKind::Ollama => {
                let mut builder = OllamaClient::builder().timeout_secs(self.timeout_secs);
                if let Some(url) = &self.base_url {
                    builder = builder.base_url(url);
                }
                Arc::new(builder.build()?.completion_model(&self.model))
            }
        };

        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_provider() {
        let settings = Settings::for_provider(ProviderKind::Ollama);
        assert_eq!(settings.model, "llama3.2");
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let err = Settings::default().validate().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("GEMINI_API_KEY")));

        let blank = Settings::default().with_api_key("   ");
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let settings = Settings::for_provider(ProviderKind::Ollama).with_model(" ");
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_build_service_reports_provider_and_model() {
        let service = Settings::default()
            .with_api_key("key")
            .with_model("gemini-1.5-pro")
            .build_service()
            .unwrap();
        assert_eq!(service.provider(), "gemini");
        assert_eq!(service.model_id(), "gemini-1.5-pro");

        let service = Settings::for_provider(ProviderKind::Ollama)
            .with_base_url("http://127.0.0.1:11434")
            .build_service()
            .unwrap();
        assert_eq!(service.provider(), "ollama");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = Settings::default().with_api_key("secret-key");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
