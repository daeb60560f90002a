//! Guardrail module: model-judged checks around an agent's completion call.
//!
//! A [`Guardrail`] is a named check bound to a [`GuardrailPhase`]:
//!
//! - **Input** guardrails run on the raw user text before the agent's
//!   completion call. A tripped input guardrail aborts the run with
//!   [`Error::InputGuardrailTriggered`](crate::Error::InputGuardrailTriggered)
//!   and the completion call is never made.
//! - **Output** guardrails run on the generated text. A tripped output
//!   guardrail replaces the answer with a blocked-output notice; the run still
//!   succeeds.
//!
//! Within a phase, guardrails run sequentially in the order they were added,
//! and the first tripwire wins.
//!
//! # Tripwire Mechanism
//!
//! Each check returns a [`GuardrailOutput`] carrying a `tripwire_triggered`
//! flag and a JSON judgment payload. The flag is decided by the check's own
//! policy; nothing downstream recomputes it from the payload.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tripline::prelude::*;
//!
//! struct NoShouting;
//!
//! #[async_trait::async_trait]
//! impl GuardrailCheck for NoShouting {
//!     async fn check(&self, _context: &RunContext, subject: &str) -> Result<GuardrailOutput> {
//!         if subject.chars().any(char::is_lowercase) {
//!             Ok(GuardrailOutput::pass())
//!         } else {
//!             Ok(GuardrailOutput::tripwire("all caps"))
//!         }
//!     }
//! }
//!
//! let guardrail = Guardrail::input("no-shouting", NoShouting);
//! ```

mod judgment;
mod safety;
mod topic;

pub use judgment::KeywordJudgment;
pub use safety::SafetyGuardrail;
pub use topic::TopicGuardrail;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{Instrument, debug, debug_span};

use crate::context::RunContext;
use crate::error::Result;
use crate::providers::{Completion, TokenUsage};

/// The output of a guardrail check function.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailOutput {
    /// Whether the tripwire was triggered.
    pub tripwire_triggered: bool,

    /// Structured judgment payload, surfaced in errors and blocked notices.
    pub output_info: Value,

    /// Completion calls the check made to reach its judgment.
    pub completion_calls: usize,

    /// Token usage reported by those calls, if any provider reported it.
    pub token_usage: Option<TokenUsage>,
}

impl GuardrailOutput {
    /// Create a passing guardrail output (tripwire not triggered).
    #[must_use]
    pub const fn pass() -> Self {
        Self::from_parts(false, Value::Null)
    }

    /// Create a failing guardrail output (tripwire triggered).
    #[must_use]
    pub fn tripwire(info: impl Into<Value>) -> Self {
        Self::from_parts(true, info.into())
    }

    /// Build an output whose tripwire fires when `passed` is false.
    #[must_use]
    pub fn from_judgment(passed: bool, info: impl Into<Value>) -> Self {
        Self::from_parts(!passed, info.into())
    }

    const fn from_parts(tripwire_triggered: bool, output_info: Value) -> Self {
        Self {
            tripwire_triggered,
            output_info,
            completion_calls: 0,
            token_usage: None,
        }
    }

    /// Account for a completion call the check made.
    #[must_use]
    pub fn with_completion(mut self, completion: &Completion) -> Self {
        self.completion_calls += 1;
        if let Some(usage) = completion.token_usage {
            *self.token_usage.get_or_insert_default() += usage;
        }
        self
    }

    /// Returns `true` if the tripwire was triggered.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.tripwire_triggered
    }
}

/// When a guardrail runs relative to the agent's completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardrailPhase {
    /// Before the completion call, on the user's text.
    Input,
    /// After the completion call, on the generated text.
    Output,
}

impl fmt::Display for GuardrailPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Trait for implementing guardrail check logic.
///
/// Checks are stateless with respect to a run and may be invoked any number
/// of times. Errors from the underlying completion service are propagated,
/// not converted into a tripwire.
#[async_trait]
pub trait GuardrailCheck: Send + Sync {
    /// Judge `subject` and return a guardrail output.
    ///
    /// # Arguments
    ///
    /// * `context`: the current run context
    /// * `subject`: user text (input phase) or generated text (output phase)
    async fn check(&self, context: &RunContext, subject: &str) -> Result<GuardrailOutput>;
}

/// A named guardrail bound to a phase.
///
/// Cloning is cheap; the check itself is shared, so one guardrail may be
/// attached to any number of agents.
#[derive(Clone)]
pub struct Guardrail {
    name: String,
    phase: GuardrailPhase,
    check: Arc<dyn GuardrailCheck>,
}

impl Guardrail {
    /// Create a guardrail with an explicit phase.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phase: GuardrailPhase,
        check: impl GuardrailCheck + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            phase,
            check: Arc::new(check),
        }
    }

    /// Create an input-phase guardrail.
    #[must_use]
    pub fn input(name: impl Into<String>, check: impl GuardrailCheck + 'static) -> Self {
        Self::new(name, GuardrailPhase::Input, check)
    }

    /// Create an output-phase guardrail.
    #[must_use]
    pub fn output(name: impl Into<String>, check: impl GuardrailCheck + 'static) -> Self {
        Self::new(name, GuardrailPhase::Output, check)
    }

    /// Returns the name of this guardrail.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the phase this guardrail runs in.
    #[must_use]
    pub const fn phase(&self) -> GuardrailPhase {
        self.phase
    }

    /// Execute this guardrail check.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by the check, typically a failed
    /// completion call.
    pub async fn run(&self, context: &RunContext, subject: &str) -> Result<GuardrailResult> {
        let span = debug_span!(
            "guardrail",
            guardrail = %self.name,
            phase = %self.phase,
            run_id = %context.run_id()
        );

        let output = self.check.check(context, subject).instrument(span).await?;
        debug!(
            guardrail = %self.name,
            triggered = output.tripwire_triggered,
            "Guardrail evaluated"
        );

        Ok(GuardrailResult {
            guardrail_name: self.name.clone(),
            phase: self.phase,
            output,
        })
    }
}

impl fmt::Debug for Guardrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guardrail")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// The result of running a guardrail.
#[derive(Debug, Clone)]
pub struct GuardrailResult {
    /// Name of the guardrail that produced this result.
    pub guardrail_name: String,

    /// Phase the guardrail ran in.
    pub phase: GuardrailPhase,

    /// The guardrail check output.
    pub output: GuardrailOutput,
}

impl GuardrailResult {
    /// Returns `true` if the tripwire was triggered.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.output.tripwire_triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    #[async_trait]
    impl GuardrailCheck for Fixed {
        async fn check(&self, _context: &RunContext, subject: &str) -> Result<GuardrailOutput> {
            Ok(GuardrailOutput::from_judgment(self.0, subject))
        }
    }

    #[test]
    fn test_output_constructors() {
        assert!(!GuardrailOutput::pass().is_triggered());
        assert!(GuardrailOutput::tripwire("nope").is_triggered());
        assert!(GuardrailOutput::from_judgment(false, Value::Null).is_triggered());
    }

    #[test]
    fn test_with_completion_accumulates_calls_and_usage() {
        let output = GuardrailOutput::pass()
            .with_completion(&Completion::new("yes").with_token_usage(TokenUsage::new(10, 2)))
            .with_completion(&Completion::new("yes"))
            .with_completion(&Completion::new("yes").with_token_usage(TokenUsage::new(5, 1)));

        assert_eq!(output.completion_calls, 3);
        assert_eq!(output.token_usage, Some(TokenUsage::new(15, 3)));
        assert_eq!(GuardrailOutput::tripwire("x").completion_calls, 0);
    }

    #[test]
    fn test_phase_constructors() {
        assert_eq!(Guardrail::input("a", Fixed(true)).phase(), GuardrailPhase::Input);
        assert_eq!(Guardrail::output("b", Fixed(true)).phase(), GuardrailPhase::Output);
        assert_eq!(GuardrailPhase::Output.to_string(), "output");
    }

    #[test]
    fn test_run_wraps_output() {
        let guardrail = Guardrail::output("fixed", Fixed(false));
        let result = tokio_test::block_on(guardrail.run(&RunContext::new(), "text")).unwrap();
        assert_eq!(result.guardrail_name, "fixed");
        assert_eq!(result.phase, GuardrailPhase::Output);
        assert!(result.is_triggered());
        assert_eq!(result.output.output_info, Value::String("text".into()));
    }
}
