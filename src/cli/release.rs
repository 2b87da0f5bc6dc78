//! `release`: release notes for a range of commits.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use super::options::{generate, AgentArgs, OutputArgs};
use crate::agent::prompts::release_notes_prompt;
use crate::agent::{OutputMode, ProcessRunner, Section};
use crate::git::GitRepository;
use crate::output::emit;
use crate::utils::{check_local_command_prerequisites, Settings};

/// Generates markdown release notes from the commit log.
#[derive(Parser, Debug)]
pub struct ReleaseCommand {
    /// Start of the range, exclusive (defaults to the latest tag).
    #[arg(long, value_name = "REF")]
    from: Option<String>,

    /// End of the range, inclusive.
    #[arg(long, value_name = "REF", default_value = "HEAD")]
    to: String,

    /// Version used in the release notes heading.
    #[arg(long, value_name = "VERSION")]
    version: Option<String>,

    #[command(flatten)]
    agent: AgentArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl ReleaseCommand {
    /// Executes the release command.
    pub async fn execute(self, settings: &Settings) -> Result<()> {
        let config = self.agent.resolve(settings)?;
        check_local_command_prerequisites(&config)?;

        let repo = GitRepository::open().context("Failed to open git repository")?;
        let prompt = self.build_prompt(&repo)?;

        let runner = ProcessRunner::new(config.clone());
        let sections = generate(&runner, &config.strategy, &prompt, OutputMode::Message).await?;
        emit(
            &sections,
            OutputMode::Message,
            &self.output.target(Section::Message),
        )
    }

    /// Returns the range start: --from, else the latest tag, else none.
    fn range_start(&self, repo: &GitRepository) -> Result<Option<String>> {
        if let Some(ref from) = self.from {
            return Ok(Some(from.clone()));
        }
        let tag = repo.latest_tag(&self.to)?;
        debug!(tag = ?tag, "Using latest tag as range start");
        Ok(tag)
    }

    /// Collects the commits in range into the prompt.
    fn build_prompt(&self, repo: &GitRepository) -> Result<String> {
        let from = self.range_start(repo)?;
        let commits = repo.commits_between(from.as_deref(), &self.to)?;

        let range = match from {
            Some(ref from) => format!("{from}..{}", self.to),
            None => self.to.clone(),
        };

        if commits.is_empty() {
            bail!("No commits found in {range}");
        }
        eprintln!("📝 {} commits in {range}", commits.len());

        Ok(release_notes_prompt(
            &range,
            &commits,
            self.version.as_deref(),
        ))
    }
}
