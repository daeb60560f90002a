//! Triage: pick the agent that should answer a query.
//!
//! [`TriageRouter`] asks the completion service to label a query as "math" or
//! "general", then hands the resulting [`Route`] to an [`AgentFactory`]. The
//! router keeps no state between calls.

use std::fmt;
use std::sync::Arc;

use tracing::{Instrument, info};

use crate::agent::Agent;
use crate::error::Result;
use crate::guardrail::{Guardrail, SafetyGuardrail, TopicGuardrail};
use crate::providers::CompletionService;
use crate::telemetry::RunMetrics;

/// Name of the agent handling math queries.
pub const MATH_AGENT_NAME: &str = "MathAgent";
/// Name of the agent handling everything else.
pub const GENERAL_AGENT_NAME: &str = "GeneralAgent";

/// Instructions for [`MATH_AGENT_NAME`].
pub const MATH_INSTRUCTIONS: &str = "You are a math agent. Solve math problems step by step.";
/// Instructions for [`GENERAL_AGENT_NAME`].
pub const GENERAL_INSTRUCTIONS: &str = "You are a helpful agent for general questions.";

const TRIAGE_PROMPT: &str =
    "Is this query math-related or general? Answer only 'math' or 'general'. Query: ";

/// The agent class a query was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Mathematics questions.
    Math,
    /// Everything else.
    General,
}

impl Route {
    /// Read a triage reply. Any reply mentioning "math", in any case, routes to
    /// [`Route::Math`]; everything else, including an empty reply, is general.
    #[must_use]
    pub fn from_reply(reply: &str) -> Self {
        if reply.trim().to_lowercase().contains("math") {
            Self::Math
        } else {
            Self::General
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Math => f.write_str("math"),
            Self::General => f.write_str("general"),
        }
    }
}

/// Builds the agent for a route.
pub trait AgentFactory: Send + Sync {
    /// Build a fresh agent for `route`.
    fn create(&self, route: Route) -> Agent;
}

/// The default agent set: a topic-guarded math agent and a general agent,
/// both behind the safety guardrail.
#[derive(Debug, Clone)]
pub struct StandardAgentFactory {
    service: Arc<dyn CompletionService>,
    topic_guardrail: Guardrail,
    safety_guardrail: Guardrail,
}

impl StandardAgentFactory {
    /// Create the factory; every agent and guardrail shares `service`.
    #[must_use]
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            topic_guardrail: Guardrail::input(
                "math_topic",
                TopicGuardrail::new(Arc::clone(&service), "math"),
            ),
            safety_guardrail: Guardrail::output(
                "output_safety",
                SafetyGuardrail::new(Arc::clone(&service)),
            ),
            service,
        }
    }
}

impl AgentFactory for StandardAgentFactory {
    fn create(&self, route: Route) -> Agent {
        match route {
            Route::Math => Agent::new(MATH_AGENT_NAME, Arc::clone(&self.service))
                .instructions(MATH_INSTRUCTIONS)
                .guardrail(self.topic_guardrail.clone())
                .guardrail(self.safety_guardrail.clone()),
            Route::General => Agent::new(GENERAL_AGENT_NAME, Arc::clone(&self.service))
                .instructions(GENERAL_INSTRUCTIONS)
                .guardrail(self.safety_guardrail.clone()),
        }
    }
}

/// Classifies queries and builds the matching agent.
///
/// # Example
///
/// ```rust,ignore
/// let router = TriageRouter::new(service);
/// let agent = router.route("What is 2+2?").await?;
/// assert_eq!(agent.name(), "MathAgent");
/// ```
#[derive(Clone)]
pub struct TriageRouter {
    service: Arc<dyn CompletionService>,
    factory: Arc<dyn AgentFactory>,
}

impl TriageRouter {
    /// Create a router using [`StandardAgentFactory`].
    #[must_use]
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        let factory = Arc::new(StandardAgentFactory::new(Arc::clone(&service)));
        Self { service, factory }
    }

    /// Replace the agent factory.
    #[must_use]
    pub fn with_factory(mut self, factory: impl AgentFactory + 'static) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Classify `input` with one completion call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Llm`](crate::Error::Llm) if the completion call fails.
    pub async fn classify(&self, input: &str) -> Result<Route> {
        let reply = self
            .service
            .generate(&format!("{TRIAGE_PROMPT}{input}"))
            .instrument(RunMetrics::triage_span())
            .await?;
        let route = Route::from_reply(&reply.text);
        info!(%route, "Query triaged");
        Ok(route)
    }

    /// Classify `input` and build the agent that should answer it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Llm`](crate::Error::Llm) if the triage call fails.
    pub async fn route(&self, input: &str) -> Result<Agent> {
        let route = self.classify(input).await?;
        Ok(self.factory.create(route))
    }
}

impl fmt::Debug for TriageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriageRouter")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}
