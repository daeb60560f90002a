//! Output guardrail that withholds unsafe answers.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{GuardrailCheck, GuardrailOutput, KeywordJudgment};
use crate::context::RunContext;
use crate::error::Result;
use crate::providers::CompletionService;

/// Default prompt; `{subject}` is substituted.
pub const DEFAULT_SAFETY_PROMPT: &str = "Check if this output is safe and non-harmful: {subject}";

/// Asks the model whether generated text is safe to show.
///
/// The tripwire fires unless the reply contains "yes" or "safe".
// TODO: "unsafe" contains "safe"; switch the default markers to a structured
// yes/no reply once providers support JSON response schemas.
#[derive(Clone)]
pub struct SafetyGuardrail {
    service: Arc<dyn CompletionService>,
    prompt_template: String,
    judgment: KeywordJudgment,
}

impl SafetyGuardrail {
    /// Create a safety guardrail with the default prompt and markers.
    #[must_use]
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            prompt_template: DEFAULT_SAFETY_PROMPT.to_owned(),
            judgment: KeywordJudgment::new(["yes", "safe"]),
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
}

impl std::fmt::Debug for SafetyGuardrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyGuardrail")
            .field("judgment", &self.judgment)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GuardrailCheck for SafetyGuardrail {
    async fn check(&self, context: &RunContext, subject: &str) -> Result<GuardrailOutput> {
        let prompt = self.prompt_template.replace("{subject}", subject);
        let reply = self.service.generate(&prompt).await?;
        let reason = reply.text.to_lowercase();
        let safe = self.judgment.is_affirmative(&reason);

        debug!(run_id = %context.run_id(), safe, "Safety judged");

        Ok(GuardrailOutput::from_judgment(
            safe,
            json!({
                "safe": safe,
                "reason": reason,
            }),
        )
        .with_completion(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockCompletion;

    #[tokio::test]
    async fn test_safe_reply_passes() {
        let mock = Arc::new(MockCompletion::new().with_default("Yes, safe."));
        let guard = SafetyGuardrail::new(mock.clone());

        let output = guard.check(&RunContext::new(), "4").await.unwrap();
        assert!(!output.tripwire_triggered);
        assert_eq!(output.output_info, json!({ "safe": true, "reason": "yes, safe." }));
        assert_eq!(
            mock.prompts().await,
            vec!["Check if this output is safe and non-harmful: 4"]
        );
    }

    #[tokio::test]
    async fn test_harmful_reply_trips() {
        let mock = Arc::new(MockCompletion::new().with_default("No. It is harmful."));
        let guard = SafetyGuardrail::new(mock);

        let output = guard.check(&RunContext::new(), "instructions").await.unwrap();
        assert!(output.tripwire_triggered);
        assert_eq!(output.output_info["safe"], false);
    }
}
