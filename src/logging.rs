//! Logging System
//!
//! Structured logging with the `tracing` crate. Level, format and
//! destination come from configuration and may be overridden through
//! `AGENTSCOPE_LOG*` environment variables.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directives, e.g. `debug` or `agentscope::scope=trace`.
pub const ENV_FILTER: &str = "AGENTSCOPE_LOG";
pub const ENV_FORMAT: &str = "AGENTSCOPE_LOG_FORMAT";
pub const ENV_OUTPUT: &str = "AGENTSCOPE_LOG_OUTPUT";
pub const ENV_FILE: &str = "AGENTSCOPE_LOG_FILE";
/// Comma-separated `module=level` pairs added to the configured ones.
pub const ENV_MODULES: &str = "AGENTSCOPE_LOG_MODULES";

const LOG_FILE_NAME: &str = "agentscope.log";

/// Event rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("invalid log format `{}` (expected text or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

/// Where events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[default]
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    #[serde(rename = "both")]
    Both,
}

impl LogOutput {
    pub fn uses_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }

    fn uses_terminal(self) -> bool {
        self != LogOutput::File
    }

    fn as_str(self) -> &'static str {
        match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
            LogOutput::FileAndStderr => "file+stderr",
            LogOutput::Both => "both",
        }
    }
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            LogOutput::Stdout,
            LogOutput::Stderr,
            LogOutput::File,
            LogOutput::FileAndStderr,
            LogOutput::Both,
        ]
        .into_iter()
        .find(|output| output.as_str() == s)
        .ok_or_else(|| {
            format!(
                "invalid log output `{}` (expected stdout, stderr, file, file+stderr or both)",
                s
            )
        })
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[logging]` section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// trace, debug, info, warn, error or off
    pub level: String,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file when `output` writes to a file; `None` picks the default
    /// under the platform state directory.
    pub file: Option<PathBuf>,

    /// ANSI colors for text written to a terminal
    pub color: bool,

    /// Per-module levels, e.g. `"agentscope::scope" = "debug"`
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: None,
            color: true,
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Apply `AGENTSCOPE_LOG_FORMAT` / `AGENTSCOPE_LOG_OUTPUT`.
    ///
    /// Unparseable values are an error.
    fn with_env_overrides(&self) -> Result<Self, ApiError> {
        let mut effective = self.clone();
        if let Ok(format) = std::env::var(ENV_FORMAT) {
            effective.format = format.parse().map_err(ApiError::ConfigError)?;
        }
        if let Ok(output) = std::env::var(ENV_OUTPUT) {
            effective.output = output.parse().map_err(ApiError::ConfigError)?;
        }
        Ok(effective)
    }
}

/// Pick the log file: CLI flag, then `AGENTSCOPE_LOG_FILE`, then the
/// configured file, then the default.
///
/// The default lives in the platform state directory, under a subdirectory
/// mirroring the workspace path when one is given.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    workspace: Option<&Path>,
) -> Result<PathBuf, ApiError> {
    let env_file = std::env::var_os(ENV_FILE).map(PathBuf::from);
    if let Some(path) = [cli_file, env_file, config_file]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
    {
        return Ok(path);
    }

    let dirs = directories::ProjectDirs::from("", "agentscope", "agentscope").ok_or_else(|| {
        ApiError::ConfigError("Could not determine home directory for log file".to_string())
    })?;
    // state_dir exists on Linux only.
    let mut dir = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();

    if let Some(ws) = workspace {
        let canonical = dunce::canonicalize(ws).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to canonicalize workspace {}: {}",
                ws.display(),
                e
            ))
        })?;
        dir.extend(canonical.components().filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        }));
    }
    Ok(dir.join(LOG_FILE_NAME))
}

/// Install the global subscriber.
///
/// `None` means defaults. Environment variables take precedence over the
/// given configuration, which the caller has already merged with CLI flags.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let base = config.cloned().unwrap_or_default();
    let install_error = |e: tracing_subscriber::util::TryInitError| {
        ApiError::ConfigError(format!("Failed to install logger: {}", e))
    };

    if !base.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(install_error);
    }

    let config = base.with_env_overrides()?;
    let filter = build_env_filter(&config)?;
    let writer = make_writer(&config)?;
    let ansi = config.color && config.format == LogFormat::Text && !config.output.uses_file();

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(ansi)
        .with_writer(writer);
    let registry = Registry::default().with(filter);

    match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry.with(layer).try_init(),
    }
    .map_err(install_error)
}

fn make_writer(config: &LoggingConfig) -> Result<BoxMakeWriter, ApiError> {
    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File | LogOutput::FileAndStderr => {
            let path = resolve_log_file_path(None, config.file.clone(), None)?;
            let file = Arc::new(open_log_file(&path)?);
            if config.output.uses_terminal() {
                BoxMakeWriter::new(file.and(std::io::stderr))
            } else {
                BoxMakeWriter::new(file)
            }
        }
    };
    Ok(writer)
}

fn open_log_file(path: &Path) -> Result<std::fs::File, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to create log directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
        })
}

/// `AGENTSCOPE_LOG` replaces everything; otherwise the configured level
/// plus module directives from the config and `AGENTSCOPE_LOG_MODULES`.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let env_modules = std::env::var(ENV_MODULES).unwrap_or_default();
    let from_env = env_modules
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(module, level)| (module.trim(), level.trim()));
    let from_config = config
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), level.as_str()));

    from_config
        .chain(from_env)
        .try_fold(EnvFilter::new(&config.level), |filter, (module, level)| {
            let directive = format!("{}={}", module, level);
            let parsed: tracing_subscriber::filter::Directive = directive.parse().map_err(|e| {
                ApiError::ConfigError(format!("Invalid log directive '{}': {}", directive, e))
            })?;
            Ok(filter.add_directive(parsed))
        })
}
