//! Scope directories and loader limits.

use super::report::serialize_opt_path;
use super::Scope;
use crate::config::xdg;
use crate::config::AgentsConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory marker that identifies a project agent directory.
pub const PROJECT_AGENTS_DIR: &str = ".agentscope/agents";

/// Directories to scan, one per scope.
///
/// `None` means the scope is absent and contributes nothing. A `Some`
/// directory must exist; resolution fails otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopePaths {
    #[serde(serialize_with = "serialize_opt_path")]
    pub global: Option<PathBuf>,
    #[serde(serialize_with = "serialize_opt_path")]
    pub project: Option<PathBuf>,
}

impl ScopePaths {
    pub fn new(global: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self { global, project }
    }

    /// Work out the scope directories for a workspace.
    ///
    /// Directories named in configuration are used as given (relative
    /// project paths are joined to the workspace root). Otherwise the global
    /// directory defaults to `$XDG_CONFIG_HOME/agentscope/agents` and the
    /// project directory to the nearest ancestor's `.agentscope/agents`;
    /// defaults that do not exist are left out.
    pub fn discover(workspace_root: &Path, agents: &AgentsConfig) -> Self {
        let root = dunce::canonicalize(workspace_root).unwrap_or_else(|_| workspace_root.to_path_buf());

        let global = match &agents.global_dir {
            Some(dir) => Some(dir.clone()),
            None => xdg::default_agents_dir().ok().filter(|dir| dir.is_dir()),
        };

        let project = match &agents.project_dir {
            Some(dir) if dir.is_absolute() => Some(dir.clone()),
            Some(dir) => Some(root.join(dir)),
            None => find_project_dir(&root),
        };

        tracing::debug!(
            global = ?global,
            project = ?project,
            "Discovered agent directories for {}",
            root.display()
        );

        Self { global, project }
    }

    pub fn get(&self, scope: Scope) -> Option<&Path> {
        match scope {
            Scope::Global => self.global.as_deref(),
            Scope::Project => self.project.as_deref(),
        }
    }
}

/// First `.agentscope/agents` directory found walking up from `start`.
pub fn find_project_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_AGENTS_DIR))
        .find(|candidate| candidate.is_dir())
}

/// Limits applied while reading agent files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderSettings {
    /// Files larger than this are rejected without being parsed.
    pub max_file_bytes: u64,
    pub follow_links: bool,
}

impl LoaderSettings {
    pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: Self::DEFAULT_MAX_FILE_BYTES,
            follow_links: true,
        }
    }
}

impl From<&AgentsConfig> for LoaderSettings {
    fn from(agents: &AgentsConfig) -> Self {
        Self {
            max_file_bytes: agents.max_file_bytes,
            follow_links: agents.follow_links,
        }
    }
}
