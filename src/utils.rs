//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{
    check_agent_available, check_git_repository, check_local_command_prerequisites,
    find_executable,
};
pub use settings::Settings;
