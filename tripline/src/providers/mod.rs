//! Completion service implementations.
//!
//! Every agent, guardrail and the triage router talk to a model through the
//! [`CompletionService`] trait: one prompt in, one [`Completion`] out.
//!
//! # Supported Providers
//!
//! - **Gemini**: Google's Generative Language API
//! - **Ollama**: local LLM inference (Llama, Qwen, Mistral, etc.)
//! - **Mock**: scripted replies for tests and offline runs
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tripline::providers::{CompletionService, gemini::GeminiClient};
//!
//! let gemini = GeminiClient::new(api_key)?;
//! let service: Arc<dyn CompletionService> =
//!     Arc::new(gemini.completion_model("gemini-2.0-flash"));
//! ```

mod common;
mod config;

pub mod gemini;
pub mod mock;
pub mod ollama;

pub use common::{ApiClient, Completion, CompletionService, TokenUsage, saturating_u32};
pub use config::{DEFAULT_TIMEOUT_SECS, HttpClientConfig};
pub use gemini::GeminiClient;
pub use mock::MockCompletion;
pub use ollama::OllamaClient;
