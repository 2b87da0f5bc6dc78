//! External AI agent integration.
//!
//! An agent is any command-line program that takes a prompt and prints
//! generated text. This module resolves which agent to run, invokes it,
//! strips the agent's diagnostic noise and splits the answer into sections.

pub mod cleaning;
pub mod error;
pub mod profile;
pub mod prompts;
pub mod runner;
pub mod sections;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_utils;

pub use cleaning::{CleaningStrategy, LineMatcher, StrategyRegistry};
pub use error::AgentError;
pub use profile::{AgentConfig, PromptDelivery};
pub use runner::{AgentRunner, ProcessRunner};
pub use sections::{OutputMode, ParsedSections, PromptResponseParser, Section};
