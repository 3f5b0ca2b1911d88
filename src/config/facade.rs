//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::AgentScopeConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(workspace_root: &Path) -> Result<AgentScopeConfig, ApiError> {
        let config = MergeService::load(workspace_root)?;
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<AgentScopeConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = MergeService::load_from_file(path)?;
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(config)
    }
}
