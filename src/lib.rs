//! # git-scribe
//!
//! Generates commit messages, pull request titles and descriptions, squash
//! commit messages and release notes by handing repository context to an
//! external AI command-line agent.
//!
//! Each command gathers context (staged diff, commit log, pull request
//! metadata), builds a prompt, runs the agent, strips the agent's diagnostic
//! noise, splits the answer into sections and prints, copies or saves it.
//!
//! ## Parsing agent output
//!
//! ```rust
//! use git_scribe::agent::{CleaningStrategy, OutputMode, PromptResponseParser};
//!
//! let parser = PromptResponseParser::new(CleaningStrategy::copilot());
//! let sections = parser.parse(
//!     "===TITLE===\nFix bug\n===MESSAGE===\nBody text\n===SQUASH===\nfix: bug (#42)",
//!     OutputMode::All,
//! );
//! assert_eq!(sections.title, "Fix bug");
//! assert_eq!(sections.squash, "fix: bug (#42)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod agent;
pub mod cli;
pub mod git;
pub mod github;
pub mod output;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of git-scribe.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
