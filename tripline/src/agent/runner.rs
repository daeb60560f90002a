//! Runner: the uniform entry point for executing an agent.

use super::config::Agent;
use super::result::RunResult;
use crate::error::Result;

/// Stateless invoker that runs an [`Agent`] and packages its output.
///
/// `Runner` owns no state, so it can be used concurrently for any number of
/// agents and inputs.
#[derive(Debug, Clone, Copy)]
pub struct Runner;

impl Runner {
    /// Execute an agent run to completion.
    ///
    /// # Errors
    ///
    /// Propagates every error raised by [`Agent::run`] unchanged, including
    /// [`Error::InputGuardrailTriggered`](crate::Error::InputGuardrailTriggered).
    pub async fn run(agent: &Agent, input: &str) -> Result<RunResult> {
        let (final_output, metrics) = agent.run_with_metrics(input).await?;
        // Input tripwires abort the run, so any tripwire left was an output one.
        Ok(RunResult {
            final_output,
            agent_name: agent.name.clone(),
            blocked: metrics.tripwires > 0,
            metrics,
        })
    }
}
