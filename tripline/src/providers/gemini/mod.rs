//! Google Gemini provider.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.
//! Only the text parts of the first candidate are used.

mod client;
mod completion;

pub use client::{GEMINI_API_BASE_URL, GeminiClient, GeminiClientBuilder};
pub use completion::CompletionModel;
