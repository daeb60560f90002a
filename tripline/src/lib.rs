#![cfg_attr(docsrs, feature(doc_cfg))]
//! Tripline routes a free-text query to a math agent or a general agent and
//! wraps the chosen agent's single model call in model-judged guardrails.
//!
//! A run has three stages:
//!
//! 1. [`triage::TriageRouter`] labels the query with one completion call and
//!    builds the matching [`agent::Agent`].
//! 2. [`agent::Agent::run`] checks the input, calls the model once, then
//!    checks the output.
//! 3. [`agent::Runner`] packages the answer as an [`agent::RunResult`].
//!
//! All model access goes through [`providers::CompletionService`].

pub mod agent;
pub mod config;
pub mod context;
pub mod error;
pub mod guardrail;
pub mod prelude;
pub mod providers;
pub mod telemetry;
pub mod triage;

pub use error::{Error, LlmError, LlmErrorKind, Result};
