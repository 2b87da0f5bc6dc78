//! Preflight validation checks for early failure detection
//!
//! Commands call these before gathering context or talking to the network,
//! so a missing repository or agent executable fails fast with a clear
//! message instead of after an expensive fetch.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::agent::{AgentConfig, AgentError};

/// Validate we're in a valid git repository
///
/// This is a lightweight check that opens the repository without
/// loading any commit data.
pub fn check_git_repository() -> Result<()> {
    crate::git::GitRepository::open().context(
        "Not in a git repository. Please run this command from within a git repository.",
    )?;
    Ok(())
}

/// Locates an executable the way the shell would.
///
/// Commands containing a path separator are checked directly; bare names
/// are searched on `PATH` (with `PATHEXT` extensions on Windows).
pub fn find_executable(command: &str) -> Option<PathBuf> {
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .flat_map(|dir| executable_names(command).map(move |name| dir.join(name)))
        .find(|path| is_executable(path))
}

#[cfg(windows)]
fn executable_names(command: &str) -> impl Iterator<Item = String> + '_ {
    let extensions = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    std::iter::once(command.to_string()).chain(
        extensions
            .split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!("{command}{ext}"))
            .collect::<Vec<_>>(),
    )
}

#[cfg(not(windows))]
fn executable_names(command: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(command.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Validate the agent executable is installed
///
/// Returns the resolved path of the executable.
pub fn check_agent_available(config: &AgentConfig) -> Result<PathBuf, AgentError> {
    match find_executable(&config.command) {
        Some(path) => {
            debug!(agent = %config.name, path = %path.display(), "Found agent executable");
            Ok(path)
        }
        None => Err(AgentError::NotFound(config.command.clone())),
    }
}

/// Combined preflight check for commands working on the local repository
///
/// Validates:
/// - Git repository access
/// - Agent executable availability
pub fn check_local_command_prerequisites(config: &AgentConfig) -> Result<()> {
    check_git_repository()?;
    check_agent_available(config)?;
    Ok(())
}
