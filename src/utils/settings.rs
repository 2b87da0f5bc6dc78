//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.git-scribe/settings.json. The file
//! provides a fallback for environment variables, the default agent and
//! custom agent profiles. Settings are loaded once at startup and passed
//! explicitly to whatever needs them.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default cap on diff characters included in a prompt.
pub const DEFAULT_MAX_DIFF_CHARS: usize = 60_000;

/// Settings loaded from $HOME/.git-scribe/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Agent used when neither --agent nor GIT_SCRIBE_AGENT is set.
    #[serde(default)]
    pub default_agent: Option<String>,

    /// Cap on diff characters included in a prompt.
    #[serde(default)]
    pub max_diff_chars: Option<usize>,

    /// Custom agent profiles, keyed by agent name.
    #[serde(default)]
    pub agents: HashMap<String, AgentSettings>,
}

/// A custom agent profile, or overrides for a built-in one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentSettings {
    /// Executable to run.
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments placed before the prompt.
    #[serde(default)]
    pub args: Option<Vec<String>>,

    /// Flag that takes the prompt as its value; the prompt goes to stdin when unset.
    #[serde(default)]
    pub prompt_flag: Option<String>,

    /// Name of the cleaning strategy to start from.
    #[serde(default)]
    pub strategy: Option<String>,

    /// Extra diagnostic line prefixes to strip.
    #[serde(default)]
    pub noise_prefixes: Vec<String>,

    /// Extra diagnostic line regular expressions to strip.
    #[serde(default)]
    pub noise_patterns: Vec<String>,
}

impl AgentSettings {
    /// Returns whether the profile adds noise matchers of its own.
    pub fn has_noise_rules(&self) -> bool {
        !self.noise_prefixes.is_empty() || !self.noise_patterns.is_empty()
    }
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default settings
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".git-scribe").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => self.env.get(key).cloned(),
        }
    }

    /// Returns the first of several environment variables that is set.
    pub fn get_env_vars(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get_env_var(key))
    }

    /// Returns the configured diff cap.
    pub fn max_diff_chars(&self) -> usize {
        self.max_diff_chars.unwrap_or(DEFAULT_MAX_DIFF_CHARS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SETTINGS_JSON: &str = r#"{
        "env": {
            "SCRIBE_TEST_VAR": "test_value",
            "GITHUB_TOKEN": "test_token"
        },
        "default_agent": "claude",
        "max_diff_chars": 1000,
        "agents": {
            "local": {
                "command": "local-agent",
                "args": ["run"],
                "prompt_flag": "--prompt",
                "noise_prefixes": ["Tokens:"]
            }
        }
    }"#;

    fn write_settings(dir: &TempDir) -> PathBuf {
        let settings_path = dir.path().join("settings.json");
        fs::write(&settings_path, SETTINGS_JSON).unwrap();
        settings_path
    }

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(write_settings(&temp_dir)).unwrap();

        assert_eq!(settings.env.get("SCRIBE_TEST_VAR").unwrap(), "test_value");
        assert_eq!(settings.default_agent.as_deref(), Some("claude"));
        assert_eq!(settings.max_diff_chars(), 1000);

        let local = settings.agents.get("local").unwrap();
        assert_eq!(local.command.as_deref(), Some("local-agent"));
        assert_eq!(local.args.as_deref(), Some(&["run".to_string()][..]));
        assert!(local.has_noise_rules());
    }

    #[test]
    fn settings_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.env.is_empty());
        assert!(settings.agents.is_empty());
        assert_eq!(settings.max_diff_chars(), DEFAULT_MAX_DIFF_CHARS);
    }

    #[test]
    fn settings_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load_from_path(&path).is_err());
    }

    #[test]
    fn settings_get_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(write_settings(&temp_dir)).unwrap();

        env::set_var("SCRIBE_TEST_VAR_ENV", "env_value");

        // Environment takes precedence over settings
        env::set_var("SCRIBE_TEST_VAR", "env_override");
        assert_eq!(
            settings.get_env_var("SCRIBE_TEST_VAR").unwrap(),
            "env_override"
        );

        env::remove_var("SCRIBE_TEST_VAR");
        assert_eq!(settings.get_env_var("SCRIBE_TEST_VAR").unwrap(), "test_value");
        assert_eq!(
            settings.get_env_var("SCRIBE_TEST_VAR_ENV").unwrap(),
            "env_value"
        );
        assert_eq!(
            settings
                .get_env_vars(&["SCRIBE_TEST_ABSENT", "SCRIBE_TEST_VAR"])
                .unwrap(),
            "test_value"
        );
        assert!(settings.get_env_var("SCRIBE_TEST_ABSENT").is_none());

        env::remove_var("SCRIBE_TEST_VAR_ENV");
    }
}
