//! Arguments and steps shared by the generating commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::agent::{
    AgentConfig, AgentRunner, CleaningStrategy, OutputMode, ParsedSections, PromptResponseParser,
    Section,
};
use crate::output::OutputTarget;
use crate::utils::Settings;

/// Agent selection.
#[derive(Args, Debug, Clone, Default)]
pub struct AgentArgs {
    /// Agent to run (copilot, claude, codex or a configured profile).
    ///
    /// Defaults to GIT_SCRIBE_AGENT, then `default_agent` in settings, then copilot.
    #[arg(long, value_name = "NAME")]
    pub agent: Option<String>,
}

impl AgentArgs {
    /// Resolves the agent configuration.
    pub fn resolve(&self, settings: &Settings) -> Result<AgentConfig> {
        AgentConfig::resolve(self.agent.as_deref(), settings)
            .context("Failed to resolve agent configuration")
    }
}

/// Where the generated text goes besides stdout.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Also write the result to FILE (.yaml/.yml writes YAML, anything else text).
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not copy the result to the clipboard.
    #[arg(long)]
    pub no_copy: bool,
}

impl OutputArgs {
    /// Builds the output target, copying `copy_section` in `all` mode.
    pub fn target(&self, copy_section: Section) -> OutputTarget {
        OutputTarget {
            copy: !self.no_copy,
            copy_section,
            file: self.output.clone(),
        }
    }
}

/// Sends the prompt to the agent and parses the answer.
pub async fn generate(
    runner: &dyn AgentRunner,
    strategy: &CleaningStrategy,
    prompt: &str,
    mode: OutputMode,
) -> Result<ParsedSections> {
    eprintln!("🤖 Asking {}...", runner.name());
    debug!(prompt_len = prompt.len(), mode = ?mode, "Generating");

    let raw = runner
        .run(prompt)
        .await
        .with_context(|| format!("Agent '{}' failed", runner.name()))?;

    let parser = PromptResponseParser::new(strategy.clone());
    let sections = parser.parse(&raw, mode);
    debug!(
        strategy = %parser.strategy().name(),
        delimited = sections.delimited,
        "Parsed agent response"
    );
    Ok(sections)
}
