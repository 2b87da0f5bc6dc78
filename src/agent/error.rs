//! Agent-specific error handling.

use thiserror::Error;

/// Errors raised while resolving or running an external agent.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The agent executable could not be found on PATH.
    #[error(
        "Agent executable '{0}' not found. Install it or pick another agent with --agent"
    )]
    NotFound(String),

    /// No built-in or configured profile exists for the requested agent.
    #[error("Unknown agent '{name}'. Known agents: {known}")]
    UnknownAgent {
        /// Requested agent name.
        name: String,
        /// Comma-separated list of known agent names.
        known: String,
    },

    /// I/O failure while talking to the agent process.
    #[error("Failed to run agent '{command}'")]
    Io {
        /// Executable that was being run.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The agent process exited unsuccessfully.
    #[error("Agent '{command}' exited with code {code}: {stderr}")]
    ProcessExit {
        /// Executable that was run.
        command: String,
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A configured noise pattern is not a valid regular expression.
    #[error("Invalid noise pattern '{pattern}' for strategy '{strategy}'")]
    InvalidPattern {
        /// Strategy the pattern belongs to.
        strategy: String,
        /// The offending pattern.
        pattern: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },
}
