#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use git2::{Repository, Signature};
use git_scribe::agent::{
    AgentConfig, AgentRunner, OutputMode, ProcessRunner, PromptResponseParser,
};
use git_scribe::git::{GitHubRepo, GitRepository};
use git_scribe::utils::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test setup that creates a temporary git repository with test commits
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
    commits: Vec<git2::Oid>,
}

impl TestRepo {
    fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().to_path_buf();

        let repo = Repository::init(&repo_path)?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok(Self {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            commits: Vec::new(),
        })
    }

    fn stage(&self, file: &str, content: &str) -> Result<()> {
        fs::write(self.repo_path.join(file), content)?;
        let mut index = self.repo.index()?;
        index.add_path(Path::new(file))?;
        index.write()?;
        Ok(())
    }

    fn add_commit(&mut self, message: &str, content: &str) -> Result<git2::Oid> {
        self.stage("test.txt", content)?;

        let mut index = self.repo.index()?;
        let signature = Signature::now("Test User", "test@example.com")?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_commit = match self.commits.last() {
            Some(last_commit_id) => Some(self.repo.find_commit(*last_commit_id)?),
            None => None,
        };
        let parents: Vec<&git2::Commit> = parent_commit.iter().collect();

        let commit_id = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        self.commits.push(commit_id);
        Ok(commit_id)
    }

    fn tag(&self, name: &str, commit: git2::Oid) -> Result<()> {
        let object = self.repo.find_object(commit, None)?;
        self.repo.tag_lightweight(name, &object, false)?;
        Ok(())
    }

    fn open(&self) -> GitRepository {
        GitRepository::open_at(&self.repo_path).unwrap()
    }
}

#[test]
fn staged_changes_on_unborn_branch() {
    let test_repo = TestRepo::new().unwrap();
    test_repo.stage("README.md", "# Project\n").unwrap();

    let changes = test_repo.open().staged_changes().unwrap();
    assert_eq!(changes.file_list(), "A\tREADME.md");
    assert!(changes.diff.contains("+# Project"));
}

#[test]
fn staged_changes_against_head() {
    let mut test_repo = TestRepo::new().unwrap();
    test_repo.add_commit("chore: init", "one\n").unwrap();

    let repo = test_repo.open();
    assert!(repo.staged_changes().unwrap().is_empty());

    test_repo.stage("test.txt", "two\n").unwrap();
    let changes = repo.staged_changes().unwrap();
    assert_eq!(changes.file_list(), "M\ttest.txt");
    assert!(changes.diff.contains("-one"));
    assert!(changes.diff.contains("+two"));
}

#[test]
fn recent_commits_newest_first() {
    let mut test_repo = TestRepo::new().unwrap();
    test_repo.add_commit("chore: init", "1").unwrap();
    test_repo.add_commit("feat: second", "2").unwrap();
    test_repo.add_commit("fix: third\n\nwith body", "3").unwrap();

    let repo = test_repo.open();
    let commits = repo.recent_commits(2).unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].subject, "fix: third");
    assert_eq!(commits[0].body, "with body");
    assert_eq!(commits[1].subject, "feat: second");
    assert_eq!(commits[0].hash, test_repo.commits[2].to_string());
}

#[test]
fn recent_commits_on_unborn_branch_is_empty() {
    let test_repo = TestRepo::new().unwrap();
    assert!(test_repo.open().recent_commits(10).unwrap().is_empty());
}

#[test]
fn commits_between_is_oldest_first() {
    let mut test_repo = TestRepo::new().unwrap();
    let first = test_repo.add_commit("chore: init", "1").unwrap();
    test_repo.add_commit("feat: a", "2").unwrap();
    test_repo.add_commit("feat: b", "3").unwrap();

    let repo = test_repo.open();
    let commits = repo
        .commits_between(Some(&first.to_string()), "HEAD")
        .unwrap();
    let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["feat: a", "feat: b"]);

    let all = repo.commits_between(None, "HEAD").unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].subject, "chore: init");
}

#[test]
fn commits_between_rejects_unknown_revision() {
    let mut test_repo = TestRepo::new().unwrap();
    test_repo.add_commit("chore: init", "1").unwrap();
    assert!(test_repo
        .open()
        .commits_between(Some("no-such-ref"), "HEAD")
        .is_err());
}

#[test]
fn latest_tag_discovery() {
    let mut test_repo = TestRepo::new().unwrap();
    let first = test_repo.add_commit("chore: init", "1").unwrap();
    test_repo.tag("v1.0.0", first).unwrap();
    let second = test_repo.add_commit("feat: a", "2").unwrap();

    let repo = test_repo.open();
    assert_eq!(repo.latest_tag("HEAD").unwrap().as_deref(), Some("v1.0.0"));

    // A tag on the end revision itself points back to the previous release
    test_repo.tag("v1.1.0", second).unwrap();
    assert_eq!(repo.latest_tag("HEAD").unwrap().as_deref(), Some("v1.0.0"));
}

#[test]
fn latest_tag_without_tags() {
    let mut test_repo = TestRepo::new().unwrap();
    test_repo.add_commit("chore: init", "1").unwrap();
    assert_eq!(test_repo.open().latest_tag("HEAD").unwrap(), None);
}

#[test]
fn github_repo_from_origin() {
    let test_repo = TestRepo::new().unwrap();
    test_repo
        .repo
        .remote("origin", "git@github.com:octo/widgets.git")
        .unwrap();

    let repo = test_repo.open();
    assert_eq!(
        repo.github_repo("origin").unwrap(),
        "octo/widgets".parse::<GitHubRepo>().unwrap()
    );
    assert!(repo.github_repo("upstream").is_err());
}

#[test]
fn current_branch_name() {
    let mut test_repo = TestRepo::new().unwrap();
    test_repo.add_commit("chore: init", "1").unwrap();
    let branch = test_repo.open().get_current_branch().unwrap();
    let head = test_repo.repo.head().unwrap();
    assert_eq!(Some(branch.as_str()), head.shorthand());
}

#[test]
fn settings_file_configures_custom_agent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{
            "default_agent": "echo-agent",
            "max_diff_chars": 100,
            "agents": {
                "echo-agent": {
                    "command": "cat",
                    "noise_prefixes": ["Tokens:"]
                }
            }
        }"#,
    )
    .unwrap();

    let settings = Settings::load_from_path(&path).unwrap();
    assert_eq!(settings.max_diff_chars(), 100);

    let config = AgentConfig::for_agent("echo-agent", &settings).unwrap();
    assert_eq!(config.command, "cat");
    assert_eq!(config.strategy.name(), "echo-agent");
}

#[cfg(unix)]
#[tokio::test]
async fn agent_round_trip_through_process() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{ "agents": { "echo-agent": { "command": "cat", "noise_prefixes": ["Tokens:"] } } }"#,
    )
    .unwrap();
    let settings = Settings::load_from_path(&path).unwrap();
    let config = AgentConfig::for_agent("echo-agent", &settings).unwrap();

    let runner = ProcessRunner::new(config.clone());
    let raw = runner
        .run("Tokens: 1234\n\n===TITLE===\nFix bug\n===MESSAGE===\nBody\n===SQUASH===\nfix: bug (#1)\nTokens: 99\n")
        .await
        .unwrap();

    let sections = PromptResponseParser::new(config.strategy).parse(&raw, OutputMode::All);
    assert!(sections.delimited);
    assert_eq!(sections.title, "Fix bug");
    assert_eq!(sections.message, "Body");
    assert_eq!(sections.squash, "fix: bug (#1)");
}
