//! GitHub REST API access for pull request context.

pub mod client;
pub mod error;
pub mod pull_request;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use error::GitHubError;
pub use pull_request::{PullRequestContext, PullRequestRef};
