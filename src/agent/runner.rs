//! Agent invocation.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::error::AgentError;
use super::profile::{AgentConfig, PromptDelivery};

/// Trait for anything that turns a prompt into raw agent output.
pub trait AgentRunner: Send + Sync {
    /// Sends the prompt and returns the agent's raw standard output.
    fn run<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// Returns the agent's display name.
    fn name(&self) -> &str;
}

/// Runs an agent as a child process, one blocking call per prompt.
pub struct ProcessRunner {
    config: AgentConfig,
}

impl ProcessRunner {
    /// Creates a runner for the given agent configuration.
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    /// Returns the agent configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn build_command(&self, prompt: &str) -> Command {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match &self.config.prompt_delivery {
            PromptDelivery::Stdin => {
                cmd.stdin(Stdio::piped());
            }
            PromptDelivery::Flag(flag) => {
                cmd.arg(flag).arg(prompt).stdin(Stdio::null());
            }
        }

        cmd
    }
}

impl AgentRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let command = self.config.command.clone();
            info!(
                agent = %self.config.name,
                command = %command,
                prompt_len = prompt.len(),
                "Invoking agent"
            );

            let mut child = self.build_command(prompt).spawn().map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    AgentError::NotFound(command.clone())
                } else {
                    AgentError::Io {
                        command: command.clone(),
                        source,
                    }
                }
            })?;

            // Feed stdin while draining stdout so a chatty agent cannot block on a full pipe
            let output = match child.stdin.take() {
                Some(mut stdin) => {
                    let feed = async move {
                        if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                            debug!(error = %e, "Agent closed stdin before reading the whole prompt");
                        }
                    };
                    let ((), output) = tokio::join!(feed, child.wait_with_output());
                    output
                }
                None => child.wait_with_output().await,
            }
            .map_err(|source| AgentError::Io {
                command: command.clone(),
                source,
            })?;

            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            if !output.status.success() {
                return Err(AgentError::ProcessExit {
                    command,
                    code: output.status.code().unwrap_or(-1),
                    stderr,
                }
                .into());
            }

            if !stderr.is_empty() {
                debug!(agent = %self.config.name, stderr = %stderr, "Agent stderr output");
            }

            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            debug!(
                agent = %self.config.name,
                response_len = stdout.len(),
                "Agent finished"
            );
            debug!(response_content = %stdout, "Agent raw response");

            Ok(stdout)
        })
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}
