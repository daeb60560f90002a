//! Input guardrail that keeps an agent on its topic.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{GuardrailCheck, GuardrailOutput, KeywordJudgment};
use crate::context::RunContext;
use crate::error::Result;
use crate::providers::CompletionService;

/// Default prompt; `{topic}` and `{subject}` are substituted.
pub const DEFAULT_TOPIC_PROMPT: &str = "Check if this input is {topic}-related: {subject}";

/// Asks the model whether the user's text is about a given topic.
///
/// The tripwire fires unless the model's reply contains "yes" or the topic
/// name. A reply containing neither is treated as off-topic.
#[derive(Clone)]
pub struct TopicGuardrail {
    service: Arc<dyn CompletionService>,
    topic: String,
    prompt_template: String,
    judgment: KeywordJudgment,
}

impl TopicGuardrail {
    /// Create a topic guardrail for `topic` (e.g., "math").
    #[must_use]
    pub fn new(service: Arc<dyn CompletionService>, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        let judgment = KeywordJudgment::new(["yes", topic.as_str()]);
        Self {
            service,
            topic,
            prompt_template: DEFAULT_TOPIC_PROMPT.to_owned(),
            judgment,
        }
    }

    /// Override the prompt template.
    #[must_use]
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Override the affirmative markers.
    #[must_use]
    pub fn with_judgment(mut self, judgment: KeywordJudgment) -> Self {
        self.judgment = judgment;
        self
    }

    /// The topic this guardrail enforces.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    fn prompt(&self, subject: &str) -> String {
        self.prompt_template
            .replace("{topic}", &self.topic)
            .replace("{subject}", subject)
    }
}

impl std::fmt::Debug for TopicGuardrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicGuardrail")
            .field("topic", &self.topic)
            .field("judgment", &self.judgment)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GuardrailCheck for TopicGuardrail {
    async fn check(&self, context: &RunContext, subject: &str) -> Result<GuardrailOutput> {
        let reply = self.service.generate(&self.prompt(subject)).await?;
        let reason = reply.text.to_lowercase();
        let on_topic = self.judgment.is_affirmative(&reason);

        debug!(run_id = %context.run_id(), topic = %self.topic, on_topic, "Topic judged");

        Ok(GuardrailOutput::from_judgment(
            on_topic,
            json!({
                "topic": self.topic,
                "on_topic": on_topic,
                "reason": reason,
            }),
        )
        .with_completion(&reply))
    }
}
