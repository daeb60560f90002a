//! Common types and traits for all providers.
//!
//! - [`CompletionService`] - the prompt-in, text-out capability every agent,
//!   guardrail and the triage router call through
//! - [`ApiClient`] - base trait for HTTP client configurations
//! - [`TokenUsage`] - token counting reported by providers that expose it

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::error::Result;

// ============================================================================
// Token Usage
// ============================================================================

/// Token usage information from a completion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Number of tokens in the input/prompt.
    pub input_tokens: u32,
    /// Number of tokens in the output/completion.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Create new token usage with specified counts.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Get total token count.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.input_tokens = self.input_tokens.saturating_add(rhs.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(rhs.output_tokens);
    }
}

/// Safely convert u64 to u32, saturating at `u32::MAX` if overflow.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn saturating_u32(value: u64) -> u32 {
    if value > u32::MAX as u64 {
        u32::MAX
    } else {
        value as u32
    }
}

// ============================================================================
// Completion
// ============================================================================

/// The result of a single completion call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// Token usage, when the provider reports it.
    pub token_usage: Option<TokenUsage>,
}

impl Completion {
    /// Create a completion from generated text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            token_usage: None,
        }
    }

    /// Set token usage.
    #[must_use]
    pub const fn with_token_usage(mut self, usage: TokenUsage) -> Self {
        self.token_usage = Some(usage);
        self
    }
}

// ============================================================================
// Completion Service
// ============================================================================

/// A text completion capability: given a prompt, return generated text.
///
/// Implementations must be safe to share across tasks; agents, guardrails and
/// the router all hold the same `Arc<dyn CompletionService>`. Calls are never
/// retried by the caller.
///
/// # Example
///
/// ```rust,ignore
/// use tripline::providers::CompletionService;
///
/// async fn ask(service: &dyn CompletionService) -> tripline::Result<String> {
///     Ok(service.generate("What is 2+2?").await?.text)
/// }
/// ```
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Get the model identifier (e.g., "gemini-2.0-flash", "llama3.2").
    fn model_id(&self) -> &str;

    /// Generate a completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Llm`](crate::Error::Llm) if the call fails or the
    /// response cannot be parsed.
    async fn generate(&self, prompt: &str) -> Result<Completion>;

    /// Get the provider name (e.g., "gemini", "ollama").
    fn provider(&self) -> &'static str {
        "unknown"
    }
}

impl std::fmt::Debug for dyn CompletionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionService")
            .field("provider", &self.provider())
            .field("model_id", &self.model_id())
            .finish()
    }
}

// ============================================================================
// API Client Infrastructure
// ============================================================================

/// Base configuration for API clients.
pub trait ApiClient: Clone + Send + Sync {
    /// Get the base URL for API requests.
    fn base_url(&self) -> &str;

    /// Get the HTTP client instance.
    fn http_client(&self) -> &reqwest::Client;

    /// Build authentication headers for API requests.
    fn auth_headers(&self) -> HeaderMap;
}
