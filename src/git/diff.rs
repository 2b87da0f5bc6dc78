//! Diff rendering for staged changes.

use anyhow::{Context, Result};
use git2::{Delta, Diff, DiffFormat};
use serde::Serialize;

/// A changed file with its git status letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Git status code (A=added, M=modified, D=deleted, R=renamed).
    pub status: String,
    /// Path to the file relative to repository root.
    pub file: String,
}

/// Changes currently staged in the index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StagedChanges {
    /// Files with staged changes.
    pub files: Vec<FileChange>,
    /// Unified diff of the staged changes.
    pub diff: String,
}

impl StagedChanges {
    /// Builds staged changes from an index diff.
    pub fn from_diff(diff: &Diff<'_>) -> Result<Self> {
        Ok(Self {
            files: file_changes(diff),
            diff: render_patch(diff)?,
        })
    }

    /// Returns whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Formats the file list as `STATUS path` lines.
    pub fn file_list(&self) -> String {
        self.files
            .iter()
            .map(|f| format!("{}\t{}", f.status, f.file))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Maps a git2 delta to its status letter.
fn status_letter(status: Delta) -> &'static str {
    match status {
        Delta::Added => "A",
        Delta::Deleted => "D",
        Delta::Modified => "M",
        Delta::Renamed => "R",
        Delta::Copied => "C",
        Delta::Typechange => "T",
        _ => "?",
    }
}

/// Lists the files touched by a diff.
fn file_changes(diff: &Diff<'_>) -> Vec<FileChange> {
    diff.deltas()
        .filter_map(|delta| {
            let path = delta.new_file().path().or_else(|| delta.old_file().path())?;
            Some(FileChange {
                status: status_letter(delta.status()).to_string(),
                file: path.to_string_lossy().to_string(),
            })
        })
        .collect()
}

/// Renders a diff as unified patch text.
fn render_patch(diff: &Diff<'_>) -> Result<String> {
    let mut patch = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        match line.origin() {
            '+' | '-' | ' ' => patch.push(line.origin()),
            _ => {}
        }
        patch.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .context("Failed to format diff")?;

    Ok(patch)
}
