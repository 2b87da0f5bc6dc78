//! GitHub REST API client.

use base64::Engine;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use super::error::GitHubError;
use crate::git::GitHubRepo;
use crate::utils::settings::Settings;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("git-scribe/", env!("CARGO_PKG_VERSION"));

/// Locations GitHub recognises for a pull request template, in lookup order.
pub const PR_TEMPLATE_PATHS: &[&str] = &[
    ".github/pull_request_template.md",
    ".github/PULL_REQUEST_TEMPLATE.md",
    "pull_request_template.md",
    "PULL_REQUEST_TEMPLATE.md",
    "docs/pull_request_template.md",
];

/// GitHub user reference.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Login name.
    pub login: String,
}

/// Branch reference on a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    /// Branch name.
    #[serde(rename = "ref")]
    pub name: String,
}

/// Pull request metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Current title.
    pub title: String,
    /// Current description, if any.
    #[serde(default)]
    pub body: Option<String>,
    /// Author.
    pub user: User,
    /// Source branch.
    pub head: BranchRef,
    /// Target branch.
    pub base: BranchRef,
    /// Browser URL.
    pub html_url: String,
    /// Whether the pull request is a draft.
    #[serde(default)]
    pub draft: bool,
}

/// A file changed by a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestFile {
    /// Path of the file.
    pub filename: String,
    /// `added`, `modified`, `removed`, `renamed`, ...
    pub status: String,
    /// Lines added.
    #[serde(default)]
    pub additions: u64,
    /// Lines removed.
    #[serde(default)]
    pub deletions: u64,
}

/// Commit message details.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// Full commit message.
    pub message: String,
}

/// A commit on a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestCommit {
    /// Commit hash.
    pub sha: String,
    /// Commit details.
    pub commit: CommitDetail,
}

/// A conversation comment on a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    /// Author; `None` for deleted accounts.
    #[serde(default)]
    pub user: Option<User>,
    /// Comment text.
    #[serde(default)]
    pub body: Option<String>,
}

/// Contents API file payload.
#[derive(Debug, Deserialize)]
struct ContentFile {
    content: String,
    encoding: String,
}

/// Minimal GitHub REST client for read-only pull request queries.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Creates a client for the given API base URL.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: Client::new(),
            base_url,
            token,
        }
    }

    /// Creates a client from GITHUB_API_URL and GITHUB_TOKEN / GH_TOKEN.
    pub fn from_settings(settings: &Settings) -> Self {
        let base_url = settings
            .get_env_var("GITHUB_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = settings.get_env_vars(&["GITHUB_TOKEN", "GH_TOKEN"]);
        debug!(base_url = %base_url, authenticated = token.is_some(), "Created GitHub client");
        Self::new(base_url, token)
    }

    /// Sends a GET request and checks the status.
    async fn get(&self, path: &str, accept: &str) -> Result<Response, GitHubError> {
        let url = format!("{}{}", self.base_url, path);
        info!(url = %url, accept = %accept, "Sending GitHub API request");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", accept)
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|source| GitHubError::Network {
            url: url.clone(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default().trim().to_string();
            debug!(url = %url, status, "GitHub API request failed");
            return Err(GitHubError::Status {
                url,
                status,
                message,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let response = self.get(path, JSON_MEDIA_TYPE).await?;
        let url = response.url().to_string();
        response
            .json()
            .await
            .map_err(|source| GitHubError::InvalidResponse { url, source })
    }

    /// Fetches pull request metadata.
    pub async fn pull_request(
        &self,
        repo: &GitHubRepo,
        number: u64,
    ) -> Result<PullRequest, GitHubError> {
        self.get_json(&format!("/repos/{repo}/pulls/{number}")).await
    }

    /// Fetches the files changed by a pull request (first 100).
    pub async fn pull_request_files(
        &self,
        repo: &GitHubRepo,
        number: u64,
    ) -> Result<Vec<PullRequestFile>, GitHubError> {
        self.get_json(&format!("/repos/{repo}/pulls/{number}/files?per_page=100"))
            .await
    }

    /// Fetches the unified diff of a pull request.
    pub async fn pull_request_diff(
        &self,
        repo: &GitHubRepo,
        number: u64,
    ) -> Result<String, GitHubError> {
        let response = self
            .get(&format!("/repos/{repo}/pulls/{number}"), DIFF_MEDIA_TYPE)
            .await?;
        let url = response.url().to_string();
        response
            .text()
            .await
            .map_err(|source| GitHubError::InvalidResponse { url, source })
    }

    /// Fetches the commits of a pull request (first 100).
    pub async fn pull_request_commits(
        &self,
        repo: &GitHubRepo,
        number: u64,
    ) -> Result<Vec<PullRequestCommit>, GitHubError> {
        self.get_json(&format!("/repos/{repo}/pulls/{number}/commits?per_page=100"))
            .await
    }

    /// Fetches the conversation comments of a pull request (first 100).
    pub async fn issue_comments(
        &self,
        repo: &GitHubRepo,
        number: u64,
    ) -> Result<Vec<IssueComment>, GitHubError> {
        self.get_json(&format!("/repos/{repo}/issues/{number}/comments?per_page=100"))
            .await
    }

    /// Fetches a text file through the contents API.
    pub async fn file_contents(
        &self,
        repo: &GitHubRepo,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError> {
        let file: ContentFile = self
            .get_json(&format!("/repos/{repo}/contents/{path}?ref={git_ref}"))
            .await?;
        decode_content(path, &file)
    }

    /// Fetches the repository's pull request template, if it has one.
    pub async fn pull_request_template(
        &self,
        repo: &GitHubRepo,
        git_ref: &str,
    ) -> Result<Option<String>, GitHubError> {
        for path in PR_TEMPLATE_PATHS {
            match self.file_contents(repo, path, git_ref).await {
                Ok(content) => {
                    debug!(path = %path, "Found pull request template");
                    return Ok(Some(content));
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}

/// Decodes a contents API payload.
fn decode_content(path: &str, file: &ContentFile) -> Result<String, GitHubError> {
    if file.encoding != "base64" {
        return Err(GitHubError::Decode {
            path: path.to_string(),
            reason: format!("unsupported encoding '{}'", file.encoding),
        });
    }

    // GitHub wraps base64 content at 60 columns
    let compact: String = file.content.split_whitespace().collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| GitHubError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|e| GitHubError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
