//! Output cleaning strategies for noisy agents.
//!
//! Some agents surround their answer with diagnostic chatter: usage and cost
//! summaries, tool-call echoes, per-model breakdowns. A [`CleaningStrategy`]
//! is a named list of line matchers describing that chatter, and a
//! [`StrategyRegistry`] maps strategy names to strategies so supporting a new
//! agent means registering an entry rather than adding branches.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::error::AgentError;
use super::sections::is_delimiter;

/// Name of the strategy that leaves output untouched.
pub const PASSTHROUGH_STRATEGY: &str = "passthrough";

/// Name of the strategy for GitHub Copilot CLI output.
pub const COPILOT_STRATEGY: &str = "copilot";

/// Usage summary prefixes the Copilot CLI prints before or after its answer.
const COPILOT_USAGE_PREFIXES: &[&str] = &[
    "Total usage est:",
    "API time spent:",
    "Total session time:",
    "Total code changes:",
    "Breakdown by AI model:",
    " claude-",
    " gpt-",
    " gemini-",
];

/// Tool trace prefixes the Copilot CLI prints before its answer.
///
/// These also start legitimate content lines (shell steps, bullets), so they
/// are only stripped ahead of the answer.
const COPILOT_TOOL_TRACE_PREFIXES: &[&str] = &["●", "  $", "  └"];

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CONVENTIONAL_COMMIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(feat|fix|refactor|docs|test|chore|style|perf|ci|build)(\([^)]*\))?!?:").unwrap()
});

/// A single line-exclusion predicate.
#[derive(Debug, Clone)]
pub enum LineMatcher {
    /// Matches lines starting with the given text.
    Prefix(String),
    /// Matches lines the regular expression finds a match in.
    Pattern(Regex),
}

impl LineMatcher {
    /// Returns whether the line is matched.
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Prefix(prefix) => line.starts_with(prefix.as_str()),
            Self::Pattern(regex) => regex.is_match(line),
        }
    }
}

/// Named set of diagnostic-line matchers for one agent's output style.
#[derive(Debug, Clone)]
pub struct CleaningStrategy {
    name: String,
    matchers: Vec<LineMatcher>,
    trailing_matchers: Vec<LineMatcher>,
}

impl Default for CleaningStrategy {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl CleaningStrategy {
    /// Creates an empty strategy with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matchers: Vec::new(),
            trailing_matchers: Vec::new(),
        }
    }

    /// Strategy that performs no cleaning.
    pub fn passthrough() -> Self {
        Self::new(PASSTHROUGH_STRATEGY)
    }

    /// Strategy for the GitHub Copilot CLI.
    pub fn copilot() -> Self {
        Self::new(COPILOT_STRATEGY)
            .with_prefixes(COPILOT_USAGE_PREFIXES.iter().copied())
            .with_leading_prefixes(COPILOT_TOOL_TRACE_PREFIXES.iter().copied())
    }

    /// Returns the strategy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the matchers applied ahead of the answer.
    pub fn matchers(&self) -> &[LineMatcher] {
        &self.matchers
    }

    /// Returns the matchers applied after the answer.
    pub fn trailing_matchers(&self) -> &[LineMatcher] {
        &self.trailing_matchers
    }

    /// Returns a copy of this strategy under a new name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds prefix matchers stripped at either end of the output.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            let matcher = LineMatcher::Prefix(prefix.into());
            self.trailing_matchers.push(matcher.clone());
            self.matchers.push(matcher);
        }
        self
    }

    /// Adds prefix matchers stripped only ahead of the answer.
    pub fn with_leading_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matchers
            .extend(prefixes.into_iter().map(|p| LineMatcher::Prefix(p.into())));
        self
    }

    /// Adds regular-expression matchers stripped at either end of the output,
    /// failing on the first invalid pattern.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self, AgentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| AgentError::InvalidPattern {
                strategy: self.name.clone(),
                pattern: pattern.to_string(),
                source,
            })?;
            self.trailing_matchers.push(LineMatcher::Pattern(regex.clone()));
            self.matchers.push(LineMatcher::Pattern(regex));
        }
        Ok(self)
    }

    /// Returns whether this strategy leaves output untouched.
    pub fn is_passthrough(&self) -> bool {
        self.matchers.is_empty() && self.trailing_matchers.is_empty()
    }

    /// Returns whether the line is agent diagnostics rather than content.
    pub fn is_diagnostic(&self, line: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(line))
    }

    /// Returns whether the line is diagnostics an agent prints after its answer.
    pub fn is_trailing_diagnostic(&self, line: &str) -> bool {
        self.trailing_matchers.iter().any(|m| m.matches(line))
    }

    /// Strips leading and trailing diagnostic output.
    ///
    /// Content starts at the first line that is a content marker or, failing
    /// that, the first non-blank line no matcher claims. Content ends at the
    /// last non-blank line no trailing matcher claims. Lines in between are
    /// kept as-is.
    pub fn clean(&self, raw: &str) -> String {
        if self.is_passthrough() {
            return raw.to_string();
        }

        let lines: Vec<&str> = raw.lines().collect();
        let is_content = |line: &&str| {
            is_content_marker(line) || (!line.trim().is_empty() && !self.is_diagnostic(line))
        };

        let Some(start) = lines.iter().position(is_content) else {
            debug!(strategy = %self.name, lines = lines.len(), "Agent output contained no content");
            return String::new();
        };
        let end = lines
            .iter()
            .rposition(|line| {
                is_content_marker(line)
                    || (!line.trim().is_empty() && !self.is_trailing_diagnostic(line))
            })
            .map_or(start + 1, |i| (i + 1).max(start + 1));

        debug!(
            strategy = %self.name,
            dropped_leading = start,
            dropped_trailing = lines.len() - end,
            "Cleaned agent output"
        );

        lines[start..end].join("\n")
    }
}

/// Returns whether a line marks the start of real content.
///
/// Markers are a conventional-commit type prefix, a markdown heading or one of
/// the section delimiters.
pub fn is_content_marker(line: &str) -> bool {
    CONVENTIONAL_COMMIT_PATTERN.is_match(line) || line.starts_with('#') || is_delimiter(line)
}

/// Maps strategy names to cleaning strategies.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, CleaningStrategy>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl StrategyRegistry {
    /// Creates a registry holding the built-in strategies.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            strategies: HashMap::new(),
        };
        registry.register(CleaningStrategy::passthrough());
        registry.register(CleaningStrategy::copilot());
        registry
    }

    /// Adds or replaces a strategy under its own name.
    pub fn register(&mut self, strategy: CleaningStrategy) {
        self.strategies.insert(strategy.name.clone(), strategy);
    }

    /// Looks up a strategy by name.
    pub fn get(&self, name: &str) -> Option<&CleaningStrategy> {
        self.strategies.get(name)
    }

    /// Looks up a strategy, falling back to passthrough for unknown names.
    pub fn resolve(&self, name: &str) -> CleaningStrategy {
        match self.get(name) {
            Some(strategy) => strategy.clone(),
            None => {
                warn!(strategy = %name, "Unknown cleaning strategy, output will not be cleaned");
                CleaningStrategy::passthrough()
            }
        }
    }

    /// Returns registered strategy names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
