//! Common imports for building and running guarded agents.

pub use crate::agent::{Agent, RunResult, Runner};
pub use crate::config::{ProviderKind, Settings};
pub use crate::context::RunContext;
pub use crate::error::{Error, Result};
pub use crate::guardrail::{
    Guardrail, GuardrailCheck, GuardrailOutput, GuardrailPhase, KeywordJudgment, SafetyGuardrail,
    TopicGuardrail,
};
pub use crate::providers::{Completion, CompletionService};
pub use crate::triage::{AgentFactory, Route, StandardAgentFactory, TriageRouter};
