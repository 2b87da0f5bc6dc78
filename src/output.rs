//! Presenting generated text: terminal, clipboard and files.

pub mod clipboard;
pub mod file;
pub mod yaml;

use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::agent::{OutputMode, ParsedSections, Section};

pub use clipboard::copy_to_clipboard;
pub use file::write_sections;
pub use yaml::to_yaml;

/// Where generated text should go besides stdout.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    /// Copy the result to the clipboard.
    pub copy: bool,
    /// Section copied in `all` mode.
    pub copy_section: Section,
    /// File to write the result to.
    pub file: Option<PathBuf>,
}

impl Default for OutputTarget {
    fn default() -> Self {
        Self {
            copy: true,
            copy_section: Section::Message,
            file: None,
        }
    }
}

/// Formats the sections for the terminal.
///
/// `all` mode labels each section; an undelimited response is shown as is.
pub fn display_text(sections: &ParsedSections, mode: OutputMode) -> String {
    match mode.section() {
        Some(section) => sections.get(section).to_string(),
        None if sections.delimited => Section::ALL
            .iter()
            .map(|s| format!("── {} ──\n{}", s.name(), sections.get(*s)))
            .collect::<Vec<_>>()
            .join("\n\n"),
        None => sections.title.clone(),
    }
}

/// Picks the text that goes to the clipboard.
///
/// Returns `None` when there is nothing to copy.
pub fn clipboard_text(
    sections: &ParsedSections,
    mode: OutputMode,
    copy_section: Section,
) -> Option<&str> {
    let text = match mode.section() {
        Some(section) => sections.get(section),
        None if sections.delimited => sections.get(copy_section),
        // Raw fallback keeps everything in the title slot
        None => sections.title.as_str(),
    };
    (!text.is_empty()).then_some(text)
}

/// Prints the result and sends it to the clipboard and output file.
///
/// Status lines go to stderr so stdout carries only the generated text.
pub fn emit(sections: &ParsedSections, mode: OutputMode, target: &OutputTarget) -> Result<()> {
    if mode == OutputMode::All && !sections.delimited && !sections.is_empty() {
        warn!("Agent response did not contain the section delimiters");
        eprintln!("⚠️  Response did not contain the expected section delimiters; showing raw output");
    }

    if sections.is_empty() {
        eprintln!("⚠️  The agent returned an empty response");
    } else {
        println!("{}", display_text(sections, mode));
    }

    if target.copy {
        if let Some(text) = clipboard_text(sections, mode, target.copy_section) {
            if copy_to_clipboard(text) {
                eprintln!("📋 Copied to clipboard");
            }
        }
    }

    if let Some(ref path) = target.file {
        write_sections(path, sections, mode)?;
        eprintln!("💾 Saved to: {}", path.display());
    }

    Ok(())
}
