//! CLI interface for git-scribe.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::utils::Settings;

pub mod commit;
pub mod config;
pub mod options;
pub mod pr;
pub mod release;

/// git-scribe: commit messages, pull request text and release notes from an AI agent.
#[derive(Parser, Debug)]
#[command(name = "git-scribe")]
#[command(
    about = "Generate commit messages, pull request text and release notes with an AI agent",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Commit message for the staged changes.
    Commit(commit::CommitCommand),
    /// Title, description and squash message for a pull request.
    Pr(pr::PrCommand),
    /// Release notes for a range of commits.
    Release(release::ReleaseCommand),
    /// Configuration and agent information.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;

        match self.command {
            Commands::Commit(commit_cmd) => commit_cmd.execute(&settings).await,
            Commands::Pr(pr_cmd) => pr_cmd.execute(&settings).await,
            Commands::Release(release_cmd) => release_cmd.execute(&settings).await,
            Commands::Config(config_cmd) => config_cmd.execute(&settings),
        }
    }
}
