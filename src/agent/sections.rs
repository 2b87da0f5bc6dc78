//! Section parsing for agent responses.
//!
//! When several outputs are requested from one agent call, the prompt asks
//! the agent to separate them with literal delimiter lines. The parser cleans
//! the raw response with the agent's [`CleaningStrategy`] and then extracts
//! the requested section(s). Malformed responses are never an error: a
//! response without the delimiters in order is returned whole as the title
//! section and flagged as undelimited.

use clap::ValueEnum;
use serde::Serialize;

use super::cleaning::CleaningStrategy;

/// Delimiter line opening the title section.
pub const TITLE_DELIMITER: &str = "===TITLE===";

/// Delimiter line opening the message section.
pub const MESSAGE_DELIMITER: &str = "===MESSAGE===";

/// Delimiter line opening the squash section.
pub const SQUASH_DELIMITER: &str = "===SQUASH===";

/// Returns whether a line is one of the section delimiters.
pub fn is_delimiter(line: &str) -> bool {
    matches!(
        line.trim(),
        TITLE_DELIMITER | MESSAGE_DELIMITER | SQUASH_DELIMITER
    )
}

/// Which section(s) a command asks the agent for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Title, message and squash in one response.
    #[default]
    All,
    /// Only the title.
    Title,
    /// Only the message body.
    Message,
    /// Only the squash commit message.
    Squash,
}

impl OutputMode {
    /// Returns the single section this mode asks for, or `None` for `All`.
    pub fn section(self) -> Option<Section> {
        match self {
            Self::All => None,
            Self::Title => Some(Section::Title),
            Self::Message => Some(Section::Message),
            Self::Squash => Some(Section::Squash),
        }
    }
}

/// A named part of an agent response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// Short title line.
    Title,
    /// Longer message or description body.
    Message,
    /// Squash commit message.
    Squash,
}

impl Section {
    /// All sections in delimiter order.
    pub const ALL: [Self; 3] = [Self::Title, Self::Message, Self::Squash];

    /// Returns the lowercase section name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Message => "message",
            Self::Squash => "squash",
        }
    }

    /// Returns the delimiter line opening this section.
    pub fn delimiter(self) -> &'static str {
        match self {
            Self::Title => TITLE_DELIMITER,
            Self::Message => MESSAGE_DELIMITER,
            Self::Squash => SQUASH_DELIMITER,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sections extracted from one agent response.
///
/// Empty strings stand for absent sections. Only the sections requested by
/// the [`OutputMode`] are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSections {
    /// Title section.
    pub title: String,
    /// Message section.
    pub message: String,
    /// Squash section.
    pub squash: String,
    /// Whether all three delimiters were found in order.
    #[serde(skip)]
    pub delimited: bool,
}

impl ParsedSections {
    /// Builds sections holding a single populated section.
    pub fn single(section: Section, text: impl Into<String>) -> Self {
        let mut sections = Self::default();
        *sections.get_mut(section) = text.into();
        sections
    }

    /// Returns the text of a section.
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Title => &self.title,
            Section::Message => &self.message,
            Section::Squash => &self.squash,
        }
    }

    fn get_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Title => &mut self.title,
            Section::Message => &mut self.message,
            Section::Squash => &mut self.squash,
        }
    }

    /// Returns whether every section is empty.
    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.get(*s).is_empty())
    }

    /// Renders the sections back into delimited text.
    pub fn to_delimited_text(&self) -> String {
        Section::ALL
            .iter()
            .map(|s| format!("{}\n{}", s.delimiter(), self.get(*s)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Turns raw agent output into the section(s) a caller asked for.
#[derive(Debug, Clone, Default)]
pub struct PromptResponseParser {
    strategy: CleaningStrategy,
}

impl PromptResponseParser {
    /// Creates a parser that cleans responses with the given strategy.
    pub fn new(strategy: CleaningStrategy) -> Self {
        Self { strategy }
    }

    /// Returns the cleaning strategy in use.
    pub fn strategy(&self) -> &CleaningStrategy {
        &self.strategy
    }

    /// Cleans `raw` and extracts the sections `mode` asks for.
    pub fn parse(&self, raw: &str, mode: OutputMode) -> ParsedSections {
        let cleaned = self.strategy.clean(raw);
        match mode.section() {
            Some(section) => ParsedSections::single(section, trim_blank_lines(&cleaned)),
            None => split_sections(&cleaned),
        }
    }
}

/// Splits delimited text into title, message and squash sections.
///
/// Anything before the title delimiter is ignored. When the three delimiters
/// are not all present in order, the whole text (trimmed) becomes the title
/// and `delimited` is `false`.
pub fn split_sections(text: &str) -> ParsedSections {
    let lines: Vec<&str> = text.lines().collect();
    let find = |marker: &str, from: usize| {
        lines
            .iter()
            .skip(from)
            .position(|line| line.trim() == marker)
            .map(|i| i + from)
    };

    let positions = find(TITLE_DELIMITER, 0).and_then(|title| {
        let message = find(MESSAGE_DELIMITER, title + 1)?;
        let squash = find(SQUASH_DELIMITER, message + 1)?;
        Some((title, message, squash))
    });

    let Some((title, message, squash)) = positions else {
        return ParsedSections {
            title: text.trim().to_string(),
            ..ParsedSections::default()
        };
    };

    let join = |range: &[&str]| range.join("\n").trim().to_string();
    ParsedSections {
        title: join(&lines[title + 1..message]),
        message: join(&lines[message + 1..squash]),
        squash: join(&lines[squash + 1..]),
        delimited: true,
    }
}

/// Removes surrounding blank lines and trailing whitespace, keeping the
/// indentation of the first content line.
fn trim_blank_lines(text: &str) -> &str {
    let Some(first) = text.find(|c: char| !c.is_whitespace()) else {
        return "";
    };
    let start = text[..first].rfind('\n').map_or(0, |i| i + 1);
    &text[start..text.trim_end().len()]
}
