//! Prompt templates sent to the agent.

use chrono::Local;

use super::sections::{OutputMode, MESSAGE_DELIMITER, SQUASH_DELIMITER, TITLE_DELIMITER};
use crate::git::{CommitSummary, StagedChanges};
use crate::github::PullRequestContext;

/// Conventional commit rules shared by the commit and squash prompts.
const CONVENTIONAL_COMMIT_GUIDELINES: &str = r#"Use the conventional commit format:

<type>(<optional scope>): <description>

<optional body>

Types: feat, fix, refactor, docs, test, chore, style, perf, ci, build.
- Use the imperative mood ("add" not "added")
- Lowercase description, no trailing period, under 72 characters
- Use the body to explain what changed and why, as a short bullet list when there are several changes"#;

/// Structure used for PR descriptions when the repository has no template.
const DEFAULT_PR_STRUCTURE: &str = r#"## Summary
<one or two sentences on what the change does and why>

## Changes
- <bullet per notable change>

## Testing
<how the change was verified>"#;

/// Closing instruction that keeps agent chatter out of the answer.
const OUTPUT_ONLY: &str =
    "Output ONLY the requested text. No preamble, no explanations, no code fences.";

/// Truncates a diff to at most `max_chars` characters.
///
/// The cut is made on a character boundary and followed by a marker stating
/// how many characters were dropped.
pub fn truncate_diff(diff: &str, max_chars: usize) -> String {
    let total = diff.chars().count();
    if total <= max_chars {
        return diff.to_string();
    }

    let kept: String = diff.chars().take(max_chars).collect();
    format!(
        "{kept}\n[diff truncated: {} more characters]",
        total - max_chars
    )
}

/// Builds the prompt for a commit message describing staged changes.
pub fn commit_message_prompt(
    staged: &StagedChanges,
    recent: &[CommitSummary],
    branch: Option<&str>,
    max_diff_chars: usize,
) -> String {
    let history = if recent.is_empty() {
        "(no previous commits)".to_string()
    } else {
        recent
            .iter()
            .map(|c| format!("- {}", c.subject))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Write a git commit message for the staged changes below.

{CONVENTIONAL_COMMIT_GUIDELINES}

Match the style of the recent commit subjects where it does not conflict with the format above.

Branch: {branch}

Staged files:
{files}

Recent commit subjects:
{history}

Staged diff:
{diff}

{OUTPUT_ONLY} Output a single commit message."#,
        branch = branch.unwrap_or("(detached HEAD)"),
        files = staged.file_list(),
        diff = truncate_diff(&staged.diff, max_diff_chars),
    )
}

/// Renders the pull request context block shared by every PR prompt.
fn pull_request_context_block(ctx: &PullRequestContext, max_diff_chars: usize) -> String {
    let body = if ctx.body.trim().is_empty() {
        "(empty)"
    } else {
        ctx.body.trim()
    };

    format!(
        r#"Pull request #{number} in {repo}: {title}{draft}
Author: @{author}
Branch: {head} -> {base}
URL: {url}

Current description:
{body}

Changed files:
{files}

Commits:
{commits}

Comments:
{comments}

Diff:
{diff}"#,
        number = ctx.number,
        repo = ctx.repo,
        title = ctx.title,
        draft = if ctx.draft { " (draft)" } else { "" },
        author = ctx.author,
        head = ctx.head_branch,
        base = ctx.base_branch,
        url = ctx.url,
        files = ctx.files,
        commits = ctx.commits,
        comments = ctx.comments,
        diff = truncate_diff(&ctx.diff, max_diff_chars),
    )
}

fn title_instructions() -> &'static str {
    "A pull request title: one line, under 72 characters, in the conventional commit format without a trailing period."
}

fn message_instructions(ctx: &PullRequestContext) -> String {
    match ctx.template.as_deref() {
        Some(template) if !template.trim().is_empty() => format!(
            "A pull request description in markdown that follows this repository template, filling in every section:\n\n{}",
            template.trim()
        ),
        _ => format!(
            "A pull request description in markdown using this structure:\n\n{DEFAULT_PR_STRUCTURE}"
        ),
    }
}

fn squash_instructions(ctx: &PullRequestContext) -> String {
    format!(
        "A squash merge commit message. First line: `<type>: <summary> (#{number})`. \
         Then a blank line and a bullet list of the notable changes.\n\n{CONVENTIONAL_COMMIT_GUIDELINES}",
        number = ctx.number
    )
}

/// Builds the prompt for one or all pull request sections.
pub fn pull_request_prompt(
    ctx: &PullRequestContext,
    mode: OutputMode,
    max_diff_chars: usize,
) -> String {
    let context = pull_request_context_block(ctx, max_diff_chars);

    let request = match mode {
        OutputMode::Title => format!(
            "Write {}\n\n{OUTPUT_ONLY}",
            lowercase_first(title_instructions())
        ),
        OutputMode::Message => format!(
            "Write {}\n\n{OUTPUT_ONLY}",
            lowercase_first(&message_instructions(ctx))
        ),
        OutputMode::Squash => format!(
            "Write {}\n\n{OUTPUT_ONLY}",
            lowercase_first(&squash_instructions(ctx))
        ),
        OutputMode::All => format!(
            r#"Write three texts for this pull request.

1. {title}

2. {message}

3. {squash}

Answer with exactly these delimiter lines, each on its own line, in this order:

{TITLE_DELIMITER}
<title>
{MESSAGE_DELIMITER}
<description>
{SQUASH_DELIMITER}
<squash commit message>

{OUTPUT_ONLY}"#,
            title = title_instructions(),
            message = message_instructions(ctx),
            squash = squash_instructions(ctx),
        ),
    };

    format!("{context}\n\n{request}")
}

/// Builds the prompt for release notes covering `commits`.
pub fn release_notes_prompt(
    range: &str,
    commits: &[CommitSummary],
    version: Option<&str>,
) -> String {
    let log = commits
        .iter()
        .map(|c| {
            if c.body.is_empty() {
                format!("- {} ({})", c.subject, c.short_hash())
            } else {
                format!(
                    "- {} ({})\n  {}",
                    c.subject,
                    c.short_hash(),
                    c.body.replace('\n', "\n  ")
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let heading = match version {
        Some(version) => format!("{version} ({})", Local::now().format("%Y-%m-%d")),
        None => format!("Unreleased ({})", Local::now().format("%Y-%m-%d")),
    };

    format!(
        r#"Write release notes in markdown for the commits in {range}.

Start with the heading `## {heading}`. Group the changes under `### Features`, `### Fixes`, `### Other changes` and omit empty groups. Write one bullet per user-visible change, merging commits that belong together, and leave out purely internal noise such as formatting or CI tweaks.

Commits ({count}, oldest first):
{log}

{OUTPUT_ONLY}"#,
        count = commits.len(),
    )
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
