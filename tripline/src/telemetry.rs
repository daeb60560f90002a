//! Telemetry for agent runs using the `tracing` ecosystem.
//!
//! The library only emits spans and events; installing a subscriber is left
//! to the binary.
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```

use std::time::Duration;

use serde::Serialize;
use tracing::{Span, info_span};

use crate::guardrail::GuardrailOutput;
use crate::providers::TokenUsage;

/// Counters collected during one agent run.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RunMetrics {
    /// Completion service calls made, guardrail calls included.
    pub completion_calls: usize,
    /// Guardrail checks evaluated.
    pub guardrail_checks: usize,
    /// Guardrail tripwires that fired.
    pub tripwires: usize,
    /// Total input tokens reported by the provider.
    pub input_tokens: u64,
    /// Total output tokens reported by the provider.
    pub output_tokens: u64,
    /// Wall-clock duration of the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl RunMetrics {
    /// Total tokens (input + output).
    #[must_use]
    pub const fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Record one completion call and its token usage, if reported.
    pub fn record_completion(&mut self, usage: Option<&TokenUsage>) {
        self.completion_calls += 1;
        if let Some(usage) = usage {
            self.input_tokens += u64::from(usage.input_tokens);
            self.output_tokens += u64::from(usage.output_tokens);
        }
    }

    /// Record an evaluated guardrail, along with any completion calls it made.
    pub fn record_guardrail(&mut self, output: &GuardrailOutput) {
        self.guardrail_checks += 1;
        self.completion_calls += output.completion_calls;
        if let Some(usage) = output.token_usage {
            self.input_tokens += u64::from(usage.input_tokens);
            self.output_tokens += u64::from(usage.output_tokens);
        }
        if output.tripwire_triggered {
            self.tripwires += 1;
        }
    }

    /// Complete the run with final duration.
    pub const fn complete(&mut self, duration: Duration) {
        self.duration = Some(duration);
    }

    /// Create a span for an agent run.
    #[must_use]
    pub fn run_span(agent: &str, run_id: &uuid::Uuid) -> Span {
        info_span!("agent_run", agent = %agent, run_id = %run_id)
    }

    /// Create a span for a triage decision.
    #[must_use]
    pub fn triage_span() -> Span {
        info_span!("triage")
    }
}

impl std::fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Agent Run Metrics")?;
        writeln!(f, "  Completion calls: {}", self.completion_calls)?;
        writeln!(
            f,
            "  Guardrails:       {} checked, {} tripped",
            self.guardrail_checks, self.tripwires
        )?;
        writeln!(
            f,
            "  Tokens:           {} (in: {}, out: {})",
            self.total_tokens(),
            self.input_tokens,
            self.output_tokens
        )?;
        if let Some(d) = self.duration {
            writeln!(f, "  Duration:         {:.2}s", d.as_secs_f64())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Completion;

    #[test]
    fn test_run_metrics() {
        let mut metrics = RunMetrics::default();
        let judged = Completion::new("yes").with_token_usage(TokenUsage::new(20, 1));
        metrics.record_guardrail(&GuardrailOutput::pass().with_completion(&judged));
        metrics.record_completion(Some(&TokenUsage::new(100, 50)));
        metrics.record_guardrail(&GuardrailOutput::tripwire("no"));
        metrics.complete(Duration::from_millis(1500));

        assert_eq!(metrics.completion_calls, 2);
        assert_eq!(metrics.guardrail_checks, 2);
        assert_eq!(metrics.tripwires, 1);
        assert_eq!(metrics.total_tokens(), 171);

        let summary = metrics.to_string();
        assert!(summary.contains("2 checked, 1 tripped"));
        assert!(summary.contains("Duration:         1.50s"));
    }
}
