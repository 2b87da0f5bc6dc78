//! Configuration-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::options::AgentArgs;
use crate::agent::profile::{known_agents, select_agent_name, PromptDelivery};
use crate::agent::{AgentConfig, LineMatcher};
use crate::github::DEFAULT_API_URL;
use crate::utils::{find_executable, Settings};

/// Configuration operations.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Shows the resolved configuration.
    Show(ShowCommand),
    /// Lists the known agents.
    Agents(AgentsCommand),
}

/// Show command options.
#[derive(Parser, Debug)]
pub struct ShowCommand {
    #[command(flatten)]
    agent: AgentArgs,
}

/// Agents command options.
#[derive(Parser, Debug)]
pub struct AgentsCommand {}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self, settings: &Settings) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(settings),
            ConfigSubcommands::Agents(agents_cmd) => agents_cmd.execute(settings),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self, settings: &Settings) -> Result<()> {
        let config = self.agent.resolve(settings)?;
        print!("{}", render_show(&config, settings));
        Ok(())
    }
}

impl AgentsCommand {
    /// Executes the agents command.
    pub fn execute(self, settings: &Settings) -> Result<()> {
        print!("{}", render_agents(settings));
        Ok(())
    }
}

fn describe_matcher(matcher: &LineMatcher) -> String {
    match matcher {
        LineMatcher::Prefix(prefix) => format!("prefix  {prefix:?}"),
        LineMatcher::Pattern(regex) => format!("pattern {:?}", regex.as_str()),
    }
}

fn describe_delivery(delivery: &PromptDelivery) -> String {
    match delivery {
        PromptDelivery::Stdin => "stdin".to_string(),
        PromptDelivery::Flag(flag) => format!("flag {flag}"),
    }
}

fn render_show(config: &AgentConfig, settings: &Settings) -> String {
    let settings_path = Settings::get_settings_path().map_or_else(
        |_| "(no home directory)".to_string(),
        |p| p.display().to_string(),
    );
    let api_url = settings
        .get_env_var("GITHUB_API_URL")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = if settings.get_env_vars(&["GITHUB_TOKEN", "GH_TOKEN"]).is_some() {
        "set"
    } else {
        "not set"
    };
    let installed = find_executable(&config.command)
        .map_or_else(|| "✗ not found".to_string(), |p| format!("✓ {}", p.display()));

    let mut out = String::new();
    out.push_str(&format!("Settings file:   {settings_path}\n"));
    out.push_str(&format!("Agent:           {}\n", config.name));
    let command_line = std::iter::once(config.command.as_str())
        .chain(config.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(&format!("  command:       {command_line}\n"));
    out.push_str(&format!("  installed:     {installed}\n"));
    out.push_str(&format!(
        "  prompt via:    {}\n",
        describe_delivery(&config.prompt_delivery)
    ));
    out.push_str(&format!("  cleaning:      {}\n", config.strategy.name()));
    let trailing: Vec<String> = config
        .strategy
        .trailing_matchers()
        .iter()
        .map(describe_matcher)
        .collect();
    for matcher in config.strategy.matchers() {
        let rule = describe_matcher(matcher);
        let scope = if trailing.contains(&rule) { "" } else { "  (leading only)" };
        out.push_str(&format!("    {rule}{scope}\n"));
    }
    out.push_str(&format!("Max diff chars:  {}\n", settings.max_diff_chars()));
    out.push_str(&format!("GitHub API:      {api_url}\n"));
    out.push_str(&format!("GitHub token:    {token}\n"));
    out
}

fn render_agents(settings: &Settings) -> String {
    let selected = select_agent_name(None, settings);
    let mut out = String::new();

    for name in known_agents(settings) {
        let marker = if name == selected { "*" } else { " " };
        let line = match AgentConfig::for_agent(&name, settings) {
            Ok(config) => {
                let status = if find_executable(&config.command).is_some() {
                    "✓"
                } else {
                    "✗"
                };
                let source = if settings.agents.contains_key(&name) {
                    "settings"
                } else {
                    "built-in"
                };
                format!(
                    "{marker} {status} {name:<12} {:<10} {source}\n",
                    config.command
                )
            }
            Err(e) => format!("{marker} ! {name:<12} {e}\n"),
        };
        out.push_str(&line);
    }
    out
}
