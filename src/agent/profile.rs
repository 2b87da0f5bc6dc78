//! Agent profiles and their resolution from flags, environment and settings.

use tracing::debug;

use super::cleaning::{CleaningStrategy, StrategyRegistry, COPILOT_STRATEGY, PASSTHROUGH_STRATEGY};
use super::error::AgentError;
use crate::utils::settings::{AgentSettings, Settings};

/// Agent used when nothing else is configured.
pub const DEFAULT_AGENT: &str = "copilot";

/// Environment variable selecting the agent.
pub const AGENT_ENV_VAR: &str = "GIT_SCRIBE_AGENT";

/// How the prompt reaches the agent process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptDelivery {
    /// Written to standard input.
    Stdin,
    /// Passed as the value of the given flag.
    Flag(String),
}

/// Fully resolved agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Agent name as selected by the user.
    pub name: String,
    /// Executable to run.
    pub command: String,
    /// Arguments placed before the prompt.
    pub args: Vec<String>,
    /// How the prompt is delivered.
    pub prompt_delivery: PromptDelivery,
    /// Cleaning applied to the agent's output.
    pub strategy: CleaningStrategy,
}

/// Built-in profile description.
struct BuiltinProfile {
    name: &'static str,
    command: &'static str,
    args: &'static [&'static str],
    prompt_flag: Option<&'static str>,
    strategy: &'static str,
}

const BUILTIN_PROFILES: &[BuiltinProfile] = &[
    BuiltinProfile {
        name: "copilot",
        command: "copilot",
        args: &[],
        prompt_flag: Some("-p"),
        strategy: COPILOT_STRATEGY,
    },
    BuiltinProfile {
        name: "claude",
        command: "claude",
        args: &["-p"],
        prompt_flag: None,
        strategy: PASSTHROUGH_STRATEGY,
    },
    BuiltinProfile {
        name: "codex",
        command: "codex",
        args: &["exec", "-"],
        prompt_flag: None,
        strategy: PASSTHROUGH_STRATEGY,
    },
];

impl BuiltinProfile {
    fn find(name: &str) -> Option<&'static Self> {
        BUILTIN_PROFILES.iter().find(|p| p.name == name)
    }
}

/// Returns the names of all known agents, built-in and configured, sorted.
pub fn known_agents(settings: &Settings) -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_PROFILES
        .iter()
        .map(|p| p.name.to_string())
        .chain(settings.agents.keys().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Chooses the agent name: flag, then GIT_SCRIBE_AGENT, then settings default.
pub fn select_agent_name(requested: Option<&str>, settings: &Settings) -> String {
    requested
        .map(String::from)
        .or_else(|| settings.get_env_var(AGENT_ENV_VAR))
        .or_else(|| settings.default_agent.clone())
        .unwrap_or_else(|| DEFAULT_AGENT.to_string())
}

impl AgentConfig {
    /// Resolves the agent to use for this invocation.
    pub fn resolve(requested: Option<&str>, settings: &Settings) -> Result<Self, AgentError> {
        let name = select_agent_name(requested, settings);
        Self::for_agent(&name, settings)
    }

    /// Builds the configuration for a named agent.
    ///
    /// A settings profile overrides the built-in profile of the same name
    /// field by field; a name known to neither is an error.
    pub fn for_agent(name: &str, settings: &Settings) -> Result<Self, AgentError> {
        let builtin = BuiltinProfile::find(name);
        let custom = settings.agents.get(name);

        if builtin.is_none() && custom.is_none() {
            return Err(AgentError::UnknownAgent {
                name: name.to_string(),
                known: known_agents(settings).join(", "),
            });
        }

        let overrides = custom.cloned().unwrap_or_default();

        let command = overrides
            .command
            .clone()
            .or_else(|| builtin.map(|b| b.command.to_string()))
            .unwrap_or_else(|| name.to_string());

        let args = overrides.args.clone().unwrap_or_else(|| {
            builtin
                .map(|b| b.args.iter().map(|a| (*a).to_string()).collect())
                .unwrap_or_default()
        });

        let prompt_delivery = match overrides
            .prompt_flag
            .clone()
            .or_else(|| builtin.and_then(|b| b.prompt_flag.map(String::from)))
        {
            Some(flag) => PromptDelivery::Flag(flag),
            None => PromptDelivery::Stdin,
        };

        let strategy = Self::strategy_for(name, builtin, &overrides)?;

        debug!(
            agent = %name,
            command = %command,
            args = ?args,
            prompt_delivery = ?prompt_delivery,
            strategy = %strategy.name(),
            "Resolved agent configuration"
        );

        Ok(Self {
            name: name.to_string(),
            command,
            args,
            prompt_delivery,
            strategy,
        })
    }

    /// Looks up the base strategy and layers the profile's noise rules on top.
    fn strategy_for(
        name: &str,
        builtin: Option<&BuiltinProfile>,
        overrides: &AgentSettings,
    ) -> Result<CleaningStrategy, AgentError> {
        let registry = StrategyRegistry::with_builtins();
        let base_name = overrides
            .strategy
            .as_deref()
            .or_else(|| builtin.map(|b| b.strategy))
            .unwrap_or(PASSTHROUGH_STRATEGY);
        let base = registry.resolve(base_name);

        if !overrides.has_noise_rules() {
            return Ok(base);
        }

        base.renamed(name)
            .with_prefixes(overrides.noise_prefixes.iter().cloned())
            .with_patterns(&overrides.noise_patterns)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn settings_with(name: &str, agent: AgentSettings) -> Settings {
        let mut settings = Settings::default();
        settings.agents.insert(name.to_string(), agent);
        settings
    }

    #[test]
    fn builtin_copilot_uses_flag_and_cleaning() {
        let config = AgentConfig::for_agent("copilot", &Settings::default()).unwrap();
        assert_eq!(config.command, "copilot");
        assert_eq!(config.prompt_delivery, PromptDelivery::Flag("-p".to_string()));
        assert_eq!(config.strategy.name(), COPILOT_STRATEGY);
        assert!(!config.strategy.is_passthrough());
    }

    #[test]
    fn builtin_claude_uses_stdin() {
        let config = AgentConfig::for_agent("claude", &Settings::default()).unwrap();
        assert_eq!(config.args, vec!["-p".to_string()]);
        assert_eq!(config.prompt_delivery, PromptDelivery::Stdin);
        assert!(config.strategy.is_passthrough());
    }

    #[test]
    fn unknown_agent_lists_known_ones() {
        let err = AgentConfig::for_agent("mystery", &Settings::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("mystery"));
        assert!(message.contains("claude, codex, copilot"));
    }

    #[test]
    fn custom_agent_from_settings() {
        let settings = settings_with(
            "local",
            AgentSettings {
                command: Some("/opt/bin/local-agent".to_string()),
                args: Some(vec!["run".to_string()]),
                prompt_flag: Some("--prompt".to_string()),
                noise_patterns: vec![r"^\[tool\]".to_string()],
                ..AgentSettings::default()
            },
        );
        let config = AgentConfig::for_agent("local", &settings).unwrap();
        assert_eq!(config.command, "/opt/bin/local-agent");
        assert_eq!(config.args, vec!["run".to_string()]);
        assert_eq!(
            config.prompt_delivery,
            PromptDelivery::Flag("--prompt".to_string())
        );
        assert_eq!(config.strategy.name(), "local");
        assert!(config.strategy.is_diagnostic("[tool] ls"));
    }

    #[test]
    fn settings_override_builtin_fields() {
        let settings = settings_with(
            "copilot",
            AgentSettings {
                noise_prefixes: vec!["Tokens:".to_string()],
                ..AgentSettings::default()
            },
        );
        let config = AgentConfig::for_agent("copilot", &settings).unwrap();
        assert_eq!(config.command, "copilot");
        assert!(config.strategy.is_diagnostic("Tokens: 10"));
        assert!(config.strategy.is_diagnostic("Total usage est: 1"));
    }

    #[test]
    fn custom_agent_defaults_command_to_name() {
        let settings = settings_with("my-agent", AgentSettings::default());
        let config = AgentConfig::for_agent("my-agent", &settings).unwrap();
        assert_eq!(config.command, "my-agent");
        assert_eq!(config.prompt_delivery, PromptDelivery::Stdin);
        assert!(config.strategy.is_passthrough());
    }

    #[test]
    fn flag_wins_over_settings_default() {
        let settings = Settings {
            default_agent: Some("claude".to_string()),
            ..Settings::default()
        };
        assert_eq!(select_agent_name(Some("codex"), &settings), "codex");
    }

    #[test]
    fn settings_env_map_selects_agent() {
        let mut settings = Settings {
            default_agent: Some("claude".to_string()),
            ..Settings::default()
        };
        settings
            .env
            .insert(AGENT_ENV_VAR.to_string(), "codex".to_string());
        if std::env::var(AGENT_ENV_VAR).is_err() {
            assert_eq!(select_agent_name(None, &settings), "codex");
        }
    }

    #[test]
    fn known_agents_include_custom() {
        let settings = settings_with("local", AgentSettings::default());
        assert_eq!(
            known_agents(&settings),
            vec!["claude", "codex", "copilot", "local"]
        );
    }
}
