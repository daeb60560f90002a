//! Per-run context handed to every guardrail check.

use uuid::Uuid;

/// Cross-cutting data for a single agent run.
///
/// A fresh context is created for every call to
/// [`Agent::run`](crate::agent::Agent::run) and is never shared between runs.
/// Guardrails receive it by reference; the built-in guardrails only use it to
/// tag their tracing events.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
    agent_name: Option<String>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    /// Create a new context with a random run id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            agent_name: None,
        }
    }

    /// Set the name of the agent being run.
    #[must_use]
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    /// Unique id of this run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Name of the agent being run, if set.
    #[must_use]
    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_are_distinct() {
        let a = RunContext::new().with_agent_name("MathAgent");
        let b = RunContext::new();
        assert_ne!(a.run_id(), b.run_id());
        assert_eq!(a.agent_name(), Some("MathAgent"));
        assert_eq!(b.agent_name(), None);
    }
}
