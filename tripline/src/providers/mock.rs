//! Scripted completion service for tests and offline runs.
//!
//! [`MockCompletion`] answers each prompt from an ordered list of rules keyed
//! by prompt substring, falling back to a default reply. Every prompt it
//! receives is recorded so callers can assert on call counts and order.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{LlmError, Result};
use crate::providers::common::{Completion, CompletionService};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    reply: Reply,
}

/// A completion service that replays scripted responses.
///
/// Rules are checked in insertion order; the first rule whose needle occurs
/// in the prompt wins.
///
/// # Example
///
/// ```rust,ignore
/// let mock = MockCompletion::new()
///     .respond_when("Is this query", "math")
///     .with_default("4");
/// ```
#[derive(Debug, Default)]
pub struct MockCompletion {
    rules: Vec<Rule>,
    default_reply: Option<Reply>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    /// Create a mock with no rules and no default reply.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` to any prompt containing `needle`.
    #[must_use]
    pub fn respond_when(mut self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Reply::Text(text.into()),
        });
        self
    }

    /// Fail with a provider error for any prompt containing `needle`.
    #[must_use]
    pub fn fail_when(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Reply::Fail(message.into()),
        });
        self
    }

    /// Reply with `text` when no rule matches.
    #[must_use]
    pub fn with_default(mut self, text: impl Into<String>) -> Self {
        self.default_reply = Some(Reply::Text(text.into()));
        self
    }

    /// Fail every prompt that no rule matches.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.default_reply = Some(Reply::Fail(message.into()));
        self
    }

    /// All prompts received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }

    fn reply_for(&self, prompt: &str) -> Option<&Reply> {
        self.rules
            .iter()
            .find(|rule| prompt.contains(&rule.needle))
            .map(|rule| &rule.reply)
            .or(self.default_reply.as_ref())
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    fn model_id(&self) -> &str {
        "mock"
    }

    fn provider(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<Completion> {
        self.prompts.lock().await.push(prompt.to_owned());

        match self.reply_for(prompt) {
            Some(Reply::Text(text)) => Ok(Completion::new(text.clone())),
            Some(Reply::Fail(message)) => Err(LlmError::provider("mock", message.clone()).into()),
            None => Err(LlmError::provider("mock", "no scripted response for prompt").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let mock = MockCompletion::new()
            .respond_when("alpha", "first")
            .respond_when("alpha beta", "second")
            .with_default("fallback");

        assert_eq!(mock.generate("alpha beta").await.unwrap().text, "first");
        assert_eq!(mock.generate("gamma").await.unwrap().text, "fallback");
        assert_eq!(mock.prompts().await, vec!["alpha beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_failures_are_recorded() {
        let mock = MockCompletion::new().failing("service down");
        let err = mock.generate("anything").await.unwrap_err();
        assert!(err.to_string().contains("service down"));
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_unscripted_prompt_errors() {
        let mock = MockCompletion::new();
        assert!(mock.generate("hello").await.is_err());
    }
}
