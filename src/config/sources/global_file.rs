//! Global config file source: `$XDG_CONFIG_HOME/agentscope/config.toml`

use crate::config::xdg;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file, if a home directory is known.
pub fn global_config_path() -> Option<PathBuf> {
    xdg::global_config_file().ok()
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Some(path) = global_config_path() else {
        return Ok(builder);
    };
    if !path.is_file() {
        debug!(config_path = %path.display(), "No global configuration file");
        return Ok(builder);
    }
    let path = dunce::canonicalize(&path).unwrap_or(path);
    Ok(builder.add_source(File::from(path).required(false)))
}
