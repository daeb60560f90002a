//! Ollama provider for locally hosted models.

mod client;
mod completion;

pub use client::{OLLAMA_API_BASE_URL, OllamaClient, OllamaClientBuilder};
pub use completion::CompletionModel;
