//! Commit summaries used as prompt context.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::Commit;
use serde::Serialize;

use super::SHORT_HASH_LEN;

/// One commit as it appears in a log.
#[derive(Debug, Clone, Serialize)]
pub struct CommitSummary {
    /// Full SHA-1 hash of the commit.
    pub hash: String,
    /// Commit author name.
    pub author: String,
    /// Author date with timezone.
    pub date: DateTime<FixedOffset>,
    /// First line of the commit message.
    pub subject: String,
    /// Remainder of the message after the subject, trimmed.
    pub body: String,
}

impl CommitSummary {
    /// Creates a summary from a git2 commit.
    pub fn from_git_commit(commit: &Commit) -> Result<Self> {
        let author = commit.author().name().unwrap_or("Unknown").to_string();

        let timestamp = commit.author().when();
        let offset = FixedOffset::east_opt(timestamp.offset_minutes() * 60)
            .context("Invalid commit timezone offset")?;
        let date = DateTime::from_timestamp(timestamp.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(&offset);

        let message = String::from_utf8_lossy(commit.message_bytes()).to_string();
        let (subject, body) = split_message(&message);

        Ok(Self {
            hash: commit.id().to_string(),
            author,
            date,
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }

    /// Returns the abbreviated hash.
    pub fn short_hash(&self) -> &str {
        &self.hash[..SHORT_HASH_LEN.min(self.hash.len())]
    }

    /// Formats the commit as a one-line log entry.
    pub fn oneline(&self) -> String {
        format!("{} {}", self.short_hash(), self.subject)
    }
}

/// Splits a commit message into its subject line and trimmed body.
fn split_message(message: &str) -> (&str, &str) {
    let message = message.trim_start();
    match message.split_once('\n') {
        Some((subject, body)) => (subject.trim_end(), body.trim()),
        None => (message.trim_end(), ""),
    }
}
