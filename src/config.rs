//! Configuration System
//!
//! Layered settings for the loader and for logging: built-in defaults, the
//! global config file, the workspace config file, then `AGENTSCOPE__*`
//! environment variables. CLI flags are applied on top by the caller.

use crate::logging::LoggingConfig;
use crate::scope::LoaderSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod paths;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_path;

/// XDG path helpers
pub mod xdg {
    pub use super::paths::xdg_root::*;
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentScopeConfig {
    /// Agent directory discovery and loading limits
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where agents are read from and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Global agent directory; `None` means `$XDG_CONFIG_HOME/agentscope/agents`
    #[serde(default)]
    pub global_dir: Option<PathBuf>,

    /// Project agent directory, relative to the workspace root unless
    /// absolute; `None` means search upward for `.agentscope/agents`
    #[serde(default)]
    pub project_dir: Option<PathBuf>,

    /// Largest agent file accepted, in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Follow symbolic links while scanning
    #[serde(default = "default_follow_links")]
    pub follow_links: bool,
}

fn default_max_file_bytes() -> u64 {
    LoaderSettings::DEFAULT_MAX_FILE_BYTES
}

fn default_follow_links() -> bool {
    true
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            global_dir: None,
            project_dir: None,
            max_file_bytes: default_max_file_bytes(),
            follow_links: default_follow_links(),
        }
    }
}

impl AgentScopeConfig {
    /// Check values the type system does not rule out.
    pub fn validate(&self) -> Result<(), String> {
        if self.agents.max_file_bytes == 0 {
            return Err("agents.max_file_bytes must be greater than zero".to_string());
        }
        for (label, dir) in [
            ("agents.global_dir", &self.agents.global_dir),
            ("agents.project_dir", &self.agents.project_dir),
        ] {
            if matches!(dir, Some(path) if path.as_os_str().is_empty()) {
                return Err(format!("{} cannot be empty", label));
            }
        }
        Ok(())
    }
}
