//! Writing generated sections to a file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::yaml::to_yaml;
use crate::agent::{OutputMode, ParsedSections};

/// Returns whether the path names a YAML file.
pub fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Renders the sections as plain text.
///
/// Single-section modes yield the section alone; `all` yields the sections
/// joined by delimiter lines, or the raw response when it was not delimited.
pub fn render_text(sections: &ParsedSections, mode: OutputMode) -> String {
    let text = match mode.section() {
        Some(section) => sections.get(section).to_string(),
        None if sections.delimited => sections.to_delimited_text(),
        None => sections.title.clone(),
    };
    format!("{text}\n")
}

/// Renders the sections as YAML.
pub fn render_yaml(sections: &ParsedSections, mode: OutputMode) -> Result<String> {
    match mode.section() {
        Some(section) => {
            let single = BTreeMap::from([(section.name(), sections.get(section))]);
            to_yaml(&single)
        }
        None => to_yaml(sections),
    }
}

/// Writes the sections to `path`, as YAML for `.yaml`/`.yml` and text otherwise.
pub fn write_sections(path: &Path, sections: &ParsedSections, mode: OutputMode) -> Result<()> {
    let content = if is_yaml_path(path) {
        render_yaml(sections, mode)?
    } else {
        render_text(sections, mode)
    };

    fs::write(path, &content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote output file");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::agent::Section;
    use tempfile::TempDir;

    fn delimited() -> ParsedSections {
        ParsedSections {
            title: "Fix bug".to_string(),
            message: "Body text".to_string(),
            squash: "fix: bug (#42)\n\n- item".to_string(),
            delimited: true,
        }
    }

    #[test]
    fn yaml_extension_detection() {
        assert!(is_yaml_path(Path::new("out.yaml")));
        assert!(is_yaml_path(Path::new("out.YML")));
        assert!(!is_yaml_path(Path::new("out.md")));
        assert!(!is_yaml_path(Path::new("yaml")));
    }

    #[test]
    fn text_in_all_mode_keeps_delimiters() {
        let text = render_text(&delimited(), OutputMode::All);
        assert_eq!(
            text,
            "===TITLE===\nFix bug\n===MESSAGE===\nBody text\n===SQUASH===\nfix: bug (#42)\n\n- item\n"
        );
    }

    #[test]
    fn text_in_all_mode_without_delimiters_is_raw() {
        let raw = ParsedSections {
            title: "just some text".to_string(),
            ..ParsedSections::default()
        };
        assert_eq!(render_text(&raw, OutputMode::All), "just some text\n");
    }

    #[test]
    fn text_in_single_mode() {
        let sections = ParsedSections::single(Section::Message, "Body");
        assert_eq!(render_text(&sections, OutputMode::Message), "Body\n");
    }

    #[test]
    fn writes_yaml_and_text_files() {
        let dir = TempDir::new().unwrap();

        let yaml_path = dir.path().join("pr.yaml");
        write_sections(&yaml_path, &delimited(), OutputMode::All).unwrap();
        let parsed: serde_yaml::Value =
            serde_yaml::from_str(&fs::read_to_string(&yaml_path).unwrap()).unwrap();
        assert_eq!(parsed["title"].as_str(), Some("Fix bug"));
        assert_eq!(parsed["squash"].as_str(), Some("fix: bug (#42)\n\n- item"));

        let single_path = dir.path().join("title.yml");
        let single = ParsedSections::single(Section::Title, "Fix bug");
        write_sections(&single_path, &single, OutputMode::Title).unwrap();
        let parsed: serde_yaml::Value =
            serde_yaml::from_str(&fs::read_to_string(&single_path).unwrap()).unwrap();
        assert_eq!(parsed["title"].as_str(), Some("Fix bug"));
        assert!(parsed.get("message").is_none());

        let text_path = dir.path().join("msg.txt");
        write_sections(&text_path, &single, OutputMode::Title).unwrap();
        assert_eq!(fs::read_to_string(&text_path).unwrap(), "Fix bug\n");
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(write_sections(&path, &delimited(), OutputMode::All).is_err());
    }
}
