//! Pull request references and prompt context.

use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::client::{GitHubClient, IssueComment, PullRequestCommit, PullRequestFile};
use crate::git::GitHubRepo;

/// Placeholder used when the changed file list cannot be fetched.
pub const FILES_PLACEHOLDER: &str = "(could not fetch file list)";
/// Placeholder used when the diff cannot be fetched.
pub const DIFF_PLACEHOLDER: &str = "(could not fetch diff)";
/// Placeholder used when the commit list cannot be fetched.
pub const COMMITS_PLACEHOLDER: &str = "(could not fetch commits)";
/// Placeholder used when the comments cannot be fetched.
pub const COMMENTS_PLACEHOLDER: &str = "(could not fetch comments)";

/// A pull request given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestRef {
    /// Bare number; the repository comes from elsewhere.
    Number(u64),
    /// Full pull request URL.
    Url {
        /// Repository named in the URL.
        repo: GitHubRepo,
        /// Pull request number.
        number: u64,
    },
}

impl PullRequestRef {
    /// Returns the pull request number.
    pub fn number(&self) -> u64 {
        match self {
            Self::Number(number) | Self::Url { number, .. } => *number,
        }
    }

    /// Returns the repository embedded in the reference, if any.
    pub fn repo(&self) -> Option<&GitHubRepo> {
        match self {
            Self::Number(_) => None,
            Self::Url { repo, .. } => Some(repo),
        }
    }
}

impl FromStr for PullRequestRef {
    type Err = anyhow::Error;

    /// Parses `42`, `#42` or `https://github.com/owner/repo/pull/42`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(number) = s.trim_start_matches('#').parse::<u64>() {
            return Ok(Self::Number(number));
        }

        let url = Url::parse(s).with_context(|| {
            format!("Invalid pull request '{s}'. Expected a number or a pull request URL")
        })?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [owner, name, "pull", number, ..] => {
                let number = number
                    .parse()
                    .with_context(|| format!("Invalid pull request number in URL: {s}"))?;
                Ok(Self::Url {
                    repo: format!("{owner}/{name}").parse()?,
                    number,
                })
            }
            _ => anyhow::bail!("Not a pull request URL: {s}"),
        }
    }
}

/// Everything the pull request prompts need.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestContext {
    /// Repository.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
    /// Current title.
    pub title: String,
    /// Current description (empty when none).
    pub body: String,
    /// Author login.
    pub author: String,
    /// Source branch.
    pub head_branch: String,
    /// Target branch.
    pub base_branch: String,
    /// Browser URL.
    pub url: String,
    /// Whether the pull request is still a draft.
    pub draft: bool,
    /// Changed files, one per line, or a placeholder.
    pub files: String,
    /// Unified diff, or a placeholder.
    pub diff: String,
    /// Commit subjects, one per line, or a placeholder.
    pub commits: String,
    /// Conversation comments, or a placeholder.
    pub comments: String,
    /// Repository pull request template, when one exists.
    pub template: Option<String>,
}

impl PullRequestContext {
    /// Fetches pull request context.
    ///
    /// Only the metadata request is required; every other field falls back
    /// to a placeholder when its request fails.
    pub async fn gather(client: &GitHubClient, repo: &GitHubRepo, number: u64) -> Result<Self> {
        let pr = client
            .pull_request(repo, number)
            .await
            .with_context(|| format!("Failed to fetch pull request #{number} from {repo}"))?;
        debug!(number, title = %pr.title, "Fetched pull request metadata");

        let files = match client.pull_request_files(repo, number).await {
            Ok(files) => format_files(&files),
            Err(e) => {
                warn!(error = %e, "Could not fetch pull request files");
                FILES_PLACEHOLDER.to_string()
            }
        };

        let diff = match client.pull_request_diff(repo, number).await {
            Ok(diff) => diff,
            Err(e) => {
                warn!(error = %e, "Could not fetch pull request diff");
                DIFF_PLACEHOLDER.to_string()
            }
        };

        let commits = match client.pull_request_commits(repo, number).await {
            Ok(commits) => format_commits(&commits),
            Err(e) => {
                warn!(error = %e, "Could not fetch pull request commits");
                COMMITS_PLACEHOLDER.to_string()
            }
        };

        let comments = match client.issue_comments(repo, number).await {
            Ok(comments) => format_comments(&comments),
            Err(e) => {
                warn!(error = %e, "Could not fetch pull request comments");
                COMMENTS_PLACEHOLDER.to_string()
            }
        };

        let template = match client.pull_request_template(repo, &pr.base.name).await {
            Ok(template) => template,
            Err(e) => {
                debug!(error = %e, "Could not fetch pull request template");
                None
            }
        };

        Ok(Self {
            repo: repo.to_string(),
            number: pr.number,
            title: pr.title,
            body: pr.body.unwrap_or_default(),
            author: pr.user.login,
            head_branch: pr.head.name,
            base_branch: pr.base.name,
            url: pr.html_url,
            draft: pr.draft,
            files,
            diff,
            commits,
            comments,
            template,
        })
    }
}

/// Formats files as `STATUS path (+a/-d)` lines.
fn format_files(files: &[PullRequestFile]) -> String {
    files
        .iter()
        .map(|f| {
            format!(
                "{} {} (+{}/-{})",
                f.status, f.filename, f.additions, f.deletions
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats commits as `shorthash subject` lines.
fn format_commits(commits: &[PullRequestCommit]) -> String {
    commits
        .iter()
        .map(|c| {
            let short = c.sha.get(..crate::git::SHORT_HASH_LEN).unwrap_or(&c.sha);
            let subject = c.commit.message.lines().next().unwrap_or("");
            format!("{short} {subject}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats comments as `@login: body` entries.
fn format_comments(comments: &[IssueComment]) -> String {
    if comments.is_empty() {
        return "(no comments)".to_string();
    }

    comments
        .iter()
        .map(|c| {
            let login = c.user.as_ref().map_or("ghost", |u| u.login.as_str());
            format!("@{login}: {}", c.body.as_deref().unwrap_or("").trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
