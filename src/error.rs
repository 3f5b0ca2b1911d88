//! Error types

use crate::scope::Scope;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal resolution errors. Per-file problems are not errors here; they are
/// reported as [`crate::scope::FileFailure`] entries.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{scope} agent directory {} is unavailable: {source}", .path.display())]
    DirectoryUnavailable {
        scope: Scope,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Crate-level error used by configuration, logging and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
