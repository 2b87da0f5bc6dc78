//! Git repository operations

use anyhow::{Context, Result};
use git2::{
    DescribeFormatOptions, DescribeOptions, ErrorClass, ErrorCode, Oid, Repository, Tree,
};
use tracing::debug;

use super::{CommitSummary, GitHubRepo, StagedChanges};

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository containing the current directory.
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".").context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Opens the repository at the specified path.
    pub fn open_at<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Returns the current branch name.
    pub fn get_current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;

        if let Some(name) = head.shorthand() {
            if name != "HEAD" {
                return Ok(name.to_string());
            }
        }

        anyhow::bail!("Repository is in detached HEAD state")
    }

    /// Returns the HEAD tree, or `None` on a branch with no commits yet.
    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(
                head.peel_to_tree().context("Failed to peel HEAD to tree")?,
            )),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }

    /// Returns the changes staged in the index relative to HEAD.
    pub fn staged_changes(&self) -> Result<StagedChanges> {
        let head_tree = self.head_tree()?;
        let index = self.repo.index().context("Failed to read index")?;
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .context("Failed to diff index against HEAD")?;

        let changes = StagedChanges::from_diff(&diff)?;
        debug!(
            files = changes.files.len(),
            diff_len = changes.diff.len(),
            "Collected staged changes"
        );
        Ok(changes)
    }

    /// Returns up to `limit` commits reachable from HEAD, newest first.
    pub fn recent_commits(&self, limit: usize) -> Result<Vec<CommitSummary>> {
        if self.head_tree()?.is_none() {
            return Ok(Vec::new());
        }

        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker.push_head().context("Failed to push HEAD")?;

        let mut commits = Vec::new();
        for oid in walker.take(limit) {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self.repo.find_commit(oid).context("Failed to find commit")?;
            commits.push(CommitSummary::from_git_commit(&commit)?);
        }

        Ok(commits)
    }

    /// Resolves a revision to a commit id.
    fn resolve_commit(&self, rev: &str) -> Result<Oid> {
        let obj = self
            .repo
            .revparse_single(rev)
            .with_context(|| format!("Failed to parse revision: {rev}"))?;
        let commit = obj
            .peel_to_commit()
            .with_context(|| format!("Revision does not point to a commit: {rev}"))?;
        Ok(commit.id())
    }

    /// Returns the non-merge commits in `from..to`, oldest first.
    ///
    /// Without `from`, every commit reachable from `to` is returned.
    pub fn commits_between(&self, from: Option<&str>, to: &str) -> Result<Vec<CommitSummary>> {
        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker
            .push(self.resolve_commit(to)?)
            .context("Failed to push end commit")?;
        if let Some(from) = from {
            walker
                .hide(self.resolve_commit(from)?)
                .context("Failed to hide start commit")?;
        }

        let mut commits = Vec::new();
        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self.repo.find_commit(oid).context("Failed to find commit")?;

            // Skip merge commits
            if commit.parent_count() > 1 {
                continue;
            }

            commits.push(CommitSummary::from_git_commit(&commit)?);
        }

        // Reverse to get chronological order (oldest first)
        commits.reverse();
        Ok(commits)
    }

    /// Returns the most recent tag reachable from `rev`.
    ///
    /// When `rev` itself carries the tag, the tag before it is returned, so a
    /// freshly tagged release still gets a non-empty range.
    pub fn latest_tag(&self, rev: &str) -> Result<Option<String>> {
        let oid = self.resolve_commit(rev)?;
        let commit = self.repo.find_commit(oid).context("Failed to find commit")?;

        let Some(tag) = describe_tag(commit.as_object())? else {
            return Ok(None);
        };

        let tagged = self.resolve_commit(&tag)?;
        if tagged != oid {
            return Ok(Some(tag));
        }

        debug!(tag = %tag, "Tag points at the end revision, looking further back");
        match commit.parent(0) {
            Ok(parent) => describe_tag(parent.as_object()),
            Err(_) => Ok(None),
        }
    }

    /// Returns the GitHub repository behind the named remote.
    pub fn github_repo(&self, remote_name: &str) -> Result<GitHubRepo> {
        GitHubRepo::from_remote(&self.repo, remote_name)
    }
}

/// Describes an object by its nearest tag name, without a distance suffix.
fn describe_tag(object: &git2::Object<'_>) -> Result<Option<String>> {
    let mut options = DescribeOptions::new();
    options.describe_tags();

    match object.describe(&options) {
        Ok(description) => {
            let mut format = DescribeFormatOptions::new();
            format.abbreviated_size(0);
            let tag = description
                .format(Some(&format))
                .context("Failed to format tag description")?;
            Ok(Some(tag))
        }
        // No tag reachable from the object
        Err(e) if e.code() == ErrorCode::NotFound || e.class() == ErrorClass::Describe => Ok(None),
        Err(e) => Err(e).context("Failed to describe commit"),
    }
}
