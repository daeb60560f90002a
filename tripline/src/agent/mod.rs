//! Agent module: guarded single-call agents and their runner.
//!
//! - **[`Agent`]** pairs instructions with a shared completion service and two
//!   ordered guardrail lists. [`Agent::run`] checks the input, makes exactly
//!   one completion call, then checks the output.
//! - **[`Runner`]** invokes an agent and wraps the answer in a [`RunResult`].
//!
//! The two guardrail phases fail differently. A tripped input guardrail is an
//! error the caller must handle; a tripped output guardrail is an ordinary
//! answer carrying a blocked-output notice.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tripline::agent::{Agent, Runner};
//!
//! let agent = Agent::new("assistant", service)
//!     .instructions("You are a helpful assistant.");
//!
//! let result = Runner::run(&agent, "Hello!").await?;
//! println!("{}", result.final_output);
//! ```

mod config;
mod result;
mod runner;

pub use config::{Agent, BLOCKED_OUTPUT_PREFIX, blocked_output_notice};
pub use result::RunResult;
pub use runner::Runner;
