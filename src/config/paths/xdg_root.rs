//! XDG Base Directory locations for agentscope.

use crate::error::ApiError;
use std::path::PathBuf;

/// Application directory name under the XDG config home
pub const APP_DIR: &str = "agentscope";

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// `$XDG_CONFIG_HOME/agentscope/`
pub fn app_config_dir() -> Result<PathBuf, ApiError> {
    Ok(config_home()?.join(APP_DIR))
}

/// Global configuration file: `$XDG_CONFIG_HOME/agentscope/config.toml`
pub fn global_config_file() -> Result<PathBuf, ApiError> {
    Ok(app_config_dir()?.join("config.toml"))
}

/// Default global agent directory: `$XDG_CONFIG_HOME/agentscope/agents/`
///
/// Unlike the workspace layout this is never created here; a missing
/// directory just means there are no global agents.
pub fn default_agents_dir() -> Result<PathBuf, ApiError> {
    Ok(app_config_dir()?.join("agents"))
}
