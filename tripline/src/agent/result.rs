//! The record a [`Runner`](super::Runner) hands back to its caller.

use serde::Serialize;

use crate::telemetry::RunMetrics;

/// Outcome of a completed agent run.
///
/// A run whose answer was withheld by an output guardrail still produces a
/// `RunResult`; its `final_output` is the blocked-output notice and `blocked`
/// is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// The agent's final text.
    pub final_output: String,
    /// Name of the agent that produced it.
    pub agent_name: String,
    /// Whether an output guardrail replaced the answer.
    pub blocked: bool,
    /// Counters collected during the run.
    pub metrics: RunMetrics,
}

impl RunResult {
    /// Returns `true` if an output guardrail replaced the answer.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }
}
