//! Git remote operations

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use git2::Repository;

/// GitHub repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    /// Owning user or organisation.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    /// Parses `owner/repo`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: name.strip_suffix(".git").unwrap_or(*name).to_string(),
            }),
            _ => anyhow::bail!("Invalid GitHub repository '{s}'. Expected OWNER/REPO"),
        }
    }
}

impl GitHubRepo {
    /// Extracts the repository from a GitHub remote URI.
    ///
    /// Handles `git@github.com:owner/repo.git`, `ssh://git@github.com/owner/repo`
    /// and `https://github.com/owner/repo.git`.
    pub fn from_remote_uri(uri: &str) -> Result<Self> {
        let path = if let Some(rest) = uri.strip_prefix("git@github.com:") {
            rest
        } else if let Some((_, rest)) = uri.split_once("github.com/") {
            rest
        } else {
            anyhow::bail!("Not a GitHub URI: {uri}");
        };

        path.trim_end_matches('/')
            .parse()
            .with_context(|| format!("Invalid GitHub repository URI: {uri}"))
    }

    /// Reads the repository from a named remote.
    pub fn from_remote(repo: &Repository, remote_name: &str) -> Result<Self> {
        let remote = repo
            .find_remote(remote_name)
            .with_context(|| format!("Remote '{remote_name}' not found"))?;
        let uri = remote
            .url()
            .with_context(|| format!("Remote '{remote_name}' has no URL"))?;
        Self::from_remote_uri(uri)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn repo(owner: &str, name: &str) -> GitHubRepo {
        GitHubRepo {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn parse_owner_repo() {
        assert_eq!("octo/widgets".parse::<GitHubRepo>().unwrap(), repo("octo", "widgets"));
        assert!("octo".parse::<GitHubRepo>().is_err());
        assert!("a/b/c".parse::<GitHubRepo>().is_err());
        assert!("/b".parse::<GitHubRepo>().is_err());
    }

    #[test]
    fn ssh_uri() {
        assert_eq!(
            GitHubRepo::from_remote_uri("git@github.com:octo/widgets.git").unwrap(),
            repo("octo", "widgets")
        );
        assert_eq!(
            GitHubRepo::from_remote_uri("ssh://git@github.com/octo/widgets").unwrap(),
            repo("octo", "widgets")
        );
    }

    #[test]
    fn https_uri() {
        assert_eq!(
            GitHubRepo::from_remote_uri("https://github.com/octo/widgets.git").unwrap(),
            repo("octo", "widgets")
        );
        assert_eq!(
            GitHubRepo::from_remote_uri("https://github.com/octo/widgets/").unwrap(),
            repo("octo", "widgets")
        );
    }

    #[test]
    fn non_github_uri() {
        assert!(GitHubRepo::from_remote_uri("https://gitlab.com/octo/widgets.git").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(repo("octo", "widgets").to_string(), "octo/widgets");
    }
}
