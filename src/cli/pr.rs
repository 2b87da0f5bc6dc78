//! `pr`: title, description and squash message for a pull request.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use super::options::{generate, AgentArgs, OutputArgs};
use crate::agent::prompts::pull_request_prompt;
use crate::agent::{
    AgentRunner, CleaningStrategy, OutputMode, ParsedSections, ProcessRunner, Section,
};
use crate::git::{GitHubRepo, GitRepository};
use crate::github::{GitHubClient, PullRequestContext, PullRequestRef};
use crate::output::emit;
use crate::utils::{check_agent_available, Settings};

/// Remote used to find the repository when neither a URL nor --repo is given.
const DEFAULT_REMOTE: &str = "origin";

/// Generates pull request text from its metadata, diff and discussion.
#[derive(Parser, Debug)]
pub struct PrCommand {
    /// Pull request number or URL.
    #[arg(value_name = "NUMBER|URL")]
    pull_request: PullRequestRef,

    /// Repository as OWNER/REPO (defaults to the origin remote).
    #[arg(long, value_name = "OWNER/REPO")]
    repo: Option<GitHubRepo>,

    /// Section(s) to generate.
    #[arg(long, value_enum, default_value_t = OutputMode::All)]
    mode: OutputMode,

    /// Section copied to the clipboard in `all` mode.
    #[arg(long, value_enum, default_value_t = Section::Message)]
    copy_section: Section,

    #[command(flatten)]
    agent: AgentArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl PrCommand {
    /// Executes the pr command.
    pub async fn execute(self, settings: &Settings) -> Result<()> {
        let config = self.agent.resolve(settings)?;
        check_agent_available(&config)?;

        let repo = self.resolve_repo()?;
        let client = GitHubClient::from_settings(settings);
        let runner = ProcessRunner::new(config.clone());

        let sections = self
            .generate_sections(&client, &repo, &runner, &config.strategy, settings)
            .await?;
        emit(&sections, self.mode, &self.output.target(self.copy_section))
    }

    /// Picks the repository from the URL, then --repo, then the origin remote.
    fn resolve_repo(&self) -> Result<GitHubRepo> {
        if let Some(repo) = self.pull_request.repo() {
            if let Some(ref flag) = self.repo {
                if flag != repo {
                    debug!(url_repo = %repo, flag_repo = %flag, "Ignoring --repo in favour of URL");
                }
            }
            return Ok(repo.clone());
        }

        if let Some(ref repo) = self.repo {
            return Ok(repo.clone());
        }

        let local = GitRepository::open().context(
            "No repository given. Pass a pull request URL, use --repo, or run inside a clone",
        )?;
        local
            .github_repo(DEFAULT_REMOTE)
            .context("Could not determine the GitHub repository from the origin remote")
    }

    /// Fetches context, asks the agent and parses its answer.
    async fn generate_sections(
        &self,
        client: &GitHubClient,
        repo: &GitHubRepo,
        runner: &dyn AgentRunner,
        strategy: &CleaningStrategy,
        settings: &Settings,
    ) -> Result<ParsedSections> {
        let number = self.pull_request.number();
        eprintln!("🔍 Fetching pull request #{number} from {repo}...");
        let ctx = PullRequestContext::gather(client, repo, number).await?;

        let prompt = pull_request_prompt(&ctx, self.mode, settings.max_diff_chars());
        generate(runner, strategy, &prompt, self.mode).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::agent::test_utils::MockAgentRunner;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(clap::Parser)]
    struct Harness {
        #[command(flatten)]
        pr: PrCommand,
    }

    fn parse(args: &[&str]) -> PrCommand {
        let mut argv = vec!["pr"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().pr
    }

    #[test]
    fn parses_defaults() {
        let cmd = parse(&["42"]);
        assert_eq!(cmd.pull_request, PullRequestRef::Number(42));
        assert_eq!(cmd.mode, OutputMode::All);
        assert_eq!(cmd.copy_section, Section::Message);
        assert!(!cmd.output.no_copy);
    }

    #[test]
    fn url_repository_wins() {
        let cmd = parse(&[
            "https://github.com/octo/widgets/pull/7",
            "--repo",
            "other/repo",
            "--mode",
            "squash",
        ]);
        assert_eq!(cmd.resolve_repo().unwrap().to_string(), "octo/widgets");
        assert_eq!(cmd.mode, OutputMode::Squash);
    }

    #[test]
    fn repo_flag_is_used_for_numbers() {
        let cmd = parse(&["7", "--repo", "octo/widgets"]);
        assert_eq!(cmd.resolve_repo().unwrap().to_string(), "octo/widgets");
    }

    #[test]
    fn rejects_bad_reference() {
        assert!(Harness::try_parse_from(["pr", "not-a-pr"]).is_err());
    }

    #[tokio::test]
    async fn generates_all_sections_from_github_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/pulls/42"))
            .and(header("Accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "number": 42,
                "title": "Add caching layer",
                "body": "WIP",
                "user": { "login": "mona" },
                "head": { "ref": "feature/cache" },
                "base": { "ref": "main" },
                "html_url": "https://github.com/octo/widgets/pull/42"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let cmd = parse(&["42", "--repo", "octo/widgets"]);
        let client = GitHubClient::new(server.uri(), None);
        let runner = MockAgentRunner::answering(
            "===TITLE===\nfeat: add caching layer\n===MESSAGE===\n## Summary\nCache.\n===SQUASH===\nfeat: add cache (#42)\n\n- cache",
        );
        let handle = runner.prompt_handle();

        let sections = cmd
            .generate_sections(
                &client,
                &cmd.resolve_repo().unwrap(),
                &runner,
                &CleaningStrategy::passthrough(),
                &Settings::default(),
            )
            .await
            .unwrap();

        assert!(sections.delimited);
        assert_eq!(sections.title, "feat: add caching layer");
        assert_eq!(sections.message, "## Summary\nCache.");
        assert_eq!(sections.squash, "feat: add cache (#42)\n\n- cache");

        let prompts = handle.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Pull request #42 in octo/widgets: Add caching layer"));
        assert!(prompts[0].contains("(could not fetch diff)"));
        assert!(prompts[0].contains("===SQUASH==="));
    }
}
