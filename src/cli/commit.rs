//! `commit`: a commit message for the staged changes.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use super::options::{generate, AgentArgs, OutputArgs};
use crate::agent::prompts::commit_message_prompt;
use crate::agent::{OutputMode, ProcessRunner, Section};
use crate::git::GitRepository;
use crate::output::emit;
use crate::utils::{check_local_command_prerequisites, Settings};

/// Generates a conventional commit message for the staged changes.
#[derive(Parser, Debug)]
pub struct CommitCommand {
    #[command(flatten)]
    agent: AgentArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Number of recent commit subjects shown to the agent as style reference.
    #[arg(long, value_name = "N", default_value_t = 10)]
    history: usize,
}

impl CommitCommand {
    /// Executes the commit command.
    pub async fn execute(self, settings: &Settings) -> Result<()> {
        let config = self.agent.resolve(settings)?;
        check_local_command_prerequisites(&config)?;

        let repo = GitRepository::open().context("Failed to open git repository")?;
        let prompt = self.build_prompt(&repo, settings)?;

        let runner = ProcessRunner::new(config.clone());
        let sections = generate(&runner, &config.strategy, &prompt, OutputMode::Message).await?;
        emit(
            &sections,
            OutputMode::Message,
            &self.output.target(Section::Message),
        )
    }

    /// Collects staged changes and recent history into the prompt.
    fn build_prompt(&self, repo: &GitRepository, settings: &Settings) -> Result<String> {
        let staged = repo.staged_changes()?;
        if staged.is_empty() {
            bail!("No staged changes. Stage files with 'git add' first.");
        }

        let recent = repo.recent_commits(self.history)?;
        let branch = repo.get_current_branch().ok();
        debug!(
            files = staged.files.len(),
            history = recent.len(),
            branch = ?branch,
            "Building commit prompt"
        );

        Ok(commit_message_prompt(
            &staged,
            &recent,
            branch.as_deref(),
            settings.max_diff_chars(),
        ))
    }
}
