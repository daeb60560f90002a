//! Agent definition and its guarded single-call run.

use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, debug, info, warn};

use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::guardrail::{Guardrail, GuardrailPhase};
use crate::providers::CompletionService;
use crate::telemetry::RunMetrics;

/// Prefix of the notice returned in place of a withheld answer.
pub const BLOCKED_OUTPUT_PREFIX: &str = "⚠️ Blocked Output:";

/// A named agent: instructions, a shared completion service, and the
/// guardrails that surround its single completion call.
///
/// Agents are cheap to build and are meant to live for one query. The
/// completion service is shared, never owned.
///
/// # Example
///
/// ```rust,ignore
/// let agent = Agent::new("MathAgent", service.clone())
///     .instructions("You are a math agent. Solve math problems step by step.")
///     .guardrail(Guardrail::input("math-topic", TopicGuardrail::new(service.clone(), "math")))
///     .guardrail(Guardrail::output("safety", SafetyGuardrail::new(service)));
///
/// let answer = agent.run("What is 2+2?").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Agent {
    pub(crate) name: String,
    pub(crate) instructions: String,
    pub(crate) service: Arc<dyn CompletionService>,
    pub(crate) input_guardrails: Vec<Guardrail>,
    pub(crate) output_guardrails: Vec<Guardrail>,
}

impl Agent {
    /// Create an agent with no instructions and no guardrails.
    #[must_use]
    pub fn new(name: impl Into<String>, service: Arc<dyn CompletionService>) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            service,
            input_guardrails: Vec::new(),
            output_guardrails: Vec::new(),
        }
    }

    /// Set the system instructions.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Append a guardrail to the list for its phase.
    ///
    /// Guardrails of the same phase run in the order they were added.
    #[must_use]
    pub fn guardrail(mut self, guardrail: Guardrail) -> Self {
        match guardrail.phase() {
            GuardrailPhase::Input => self.input_guardrails.push(guardrail),
            GuardrailPhase::Output => self.output_guardrails.push(guardrail),
        }
        self
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the system instructions.
    #[must_use]
    pub fn get_instructions(&self) -> &str {
        &self.instructions
    }

    /// Input guardrails, in run order.
    #[must_use]
    pub fn input_guardrails(&self) -> &[Guardrail] {
        &self.input_guardrails
    }

    /// Output guardrails, in run order.
    #[must_use]
    pub fn output_guardrails(&self) -> &[Guardrail] {
        &self.output_guardrails
    }

    /// The shared completion service.
    #[must_use]
    pub fn service(&self) -> &Arc<dyn CompletionService> {
        &self.service
    }

    /// Build the prompt for the main completion call.
    #[must_use]
    pub fn build_prompt(&self, input: &str) -> String {
        format!("{}\n\nUser: {input}", self.instructions)
    }

    /// Run the agent on `input` and return the final text.
    ///
    /// Input guardrails run first; the first tripwire aborts the run before
    /// the completion call. Output guardrails then judge the generated text;
    /// the first tripwire replaces it with a blocked-output notice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputGuardrailTriggered`] if an input guardrail trips,
    /// or [`Error::Llm`] if any completion call fails.
    pub async fn run(&self, input: &str) -> Result<String> {
        self.run_with_metrics(input).await.map(|(output, _)| output)
    }

    /// Same as [`run`](Self::run), also returning the run's counters.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn run_with_metrics(&self, input: &str) -> Result<(String, RunMetrics)> {
        let context = RunContext::new().with_agent_name(&self.name);
        let span = RunMetrics::run_span(&self.name, &context.run_id());
        self.run_in_context(&context, input).instrument(span).await
    }

    async fn run_in_context(
        &self,
        context: &RunContext,
        input: &str,
    ) -> Result<(String, RunMetrics)> {
        let started = Instant::now();
        let mut metrics = RunMetrics::default();

        for guardrail in &self.input_guardrails {
            let result = guardrail.run(context, input).await?;
            metrics.record_guardrail(&result.output);
            if result.is_triggered() {
                warn!(guardrail = %result.guardrail_name, "Input guardrail tripped, request blocked");
                return Err(Error::input_guardrail_triggered(
                    result.guardrail_name,
                    result.output.output_info,
                ));
            }
        }

        debug!(agent = %self.name, "Calling completion service");
        let completion = self.service.generate(&self.build_prompt(input)).await?;
        metrics.record_completion(completion.token_usage.as_ref());

        let mut output = completion.text;
        for guardrail in &self.output_guardrails {
            let result = guardrail.run(context, &output).await?;
            metrics.record_guardrail(&result.output);
            if result.is_triggered() {
                warn!(guardrail = %result.guardrail_name, "Output guardrail tripped, answer withheld");
                output = blocked_output_notice(&result.output.output_info);
                break;
            }
        }

        metrics.complete(started.elapsed());
        info!(
            agent = %self.name,
            completion_calls = metrics.completion_calls,
            tripwires = metrics.tripwires,
            "Agent run finished"
        );

        Ok((output, metrics))
    }
}

/// The text returned in place of an answer withheld by an output guardrail.
#[must_use]
pub fn blocked_output_notice(info: &serde_json::Value) -> String {
    format!("{BLOCKED_OUTPUT_PREFIX} {info}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrail::SafetyGuardrail;
    use crate::providers::MockCompletion;

    #[test]
    fn test_guardrails_sorted_by_phase() {
        let service: Arc<dyn CompletionService> = Arc::new(MockCompletion::new());
        let agent = Agent::new("a", service.clone())
            .guardrail(Guardrail::output("safety", SafetyGuardrail::new(service.clone())))
            .guardrail(Guardrail::output("safety-2", SafetyGuardrail::new(service)));

        assert!(agent.input_guardrails().is_empty());
        let names: Vec<&str> = agent.output_guardrails().iter().map(Guardrail::name).collect();
        assert_eq!(names, ["safety", "safety-2"]);
    }

    #[test]
    fn test_prompt_includes_instructions_and_input() {
        let agent = Agent::new("a", Arc::new(MockCompletion::new())).instructions("Be brief.");
        assert_eq!(agent.build_prompt("hi"), "Be brief.\n\nUser: hi");
    }

    #[test]
    fn test_blocked_notice_embeds_payload() {
        let notice = blocked_output_notice(&serde_json::json!({ "safe": false }));
        assert_eq!(notice, "⚠️ Blocked Output: {\"safe\":false}");
    }
}
