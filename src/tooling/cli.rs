//! CLI Tooling
//!
//! Command-line interface for checking and inspecting agent definitions.
//! Commands render to a string; the binary prints it and maps failures to
//! the exit status.

use crate::agent::AgentCatalog;
use crate::config::{global_config_path, workspace_config_path, AgentScopeConfig, ConfigLoader};
use crate::error::ApiError;
use crate::logging::{LogFormat, LogOutput};
use crate::scope::{self, LoaderSettings, ScopePaths, ScopedAgent};
use crate::tooling::presentation::{
    format_agent_list_json, format_agent_list_text, format_agent_show_json,
    format_agent_show_text, format_check_json, format_check_text, format_file_reports_json,
    format_file_reports_text, format_paths_text, FileReport,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

/// agentscope - validate and inspect layered agent configurations
#[derive(Parser, Debug)]
#[command(name = "agentscope")]
#[command(about = "Validate and inspect global and project agent configurations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Global agent directory (overrides configuration)
    #[arg(long)]
    pub global_dir: Option<PathBuf>,

    /// Project agent directory (overrides configuration)
    #[arg(long)]
    pub project_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate individual agent files
    Validate {
        /// Agent files (.yaml, .yml, .toml)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Resolve both scopes and report every invalid file
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
        /// Also list valid agents
        #[arg(long)]
        verbose: bool,
    },
    /// List merged agents
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
        /// Only agents carrying any of these tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Only agents whose file patterns match this path
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show one merged agent
    Show {
        /// Agent name
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Print the resolved agent directories and config files
    Paths {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Short command name for logging.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Validate { .. } => "validate",
        Commands::Check { .. } => "check",
        Commands::List { .. } => "list",
        Commands::Show { .. } => "show",
        Commands::Paths { .. } => "paths",
    }
}

/// Rendered command result.
///
/// `success` is false when a command ran to completion but found invalid
/// agent files; the binary exits with status 1 in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Directory overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ScopeOverrides {
    pub global_dir: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
}

impl From<&Cli> for ScopeOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            global_dir: cli.global_dir.clone(),
            project_dir: cli.project_dir.clone(),
        }
    }
}

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    format!("Error: {}", e)
}

/// Load configuration the way every command does: an explicit file, or the
/// layered global/workspace sources.
pub fn load_config(
    workspace_root: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> Result<AgentScopeConfig, ApiError> {
    match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(workspace_root),
    }
}

/// Everything a command needs: configuration, scope directories and the
/// catalog built from them.
pub struct RunContext {
    workspace_root: PathBuf,
    config: AgentScopeConfig,
    settings: LoaderSettings,
    catalog: AgentCatalog,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        overrides: ScopeOverrides,
    ) -> Result<Self, ApiError> {
        let mut config = load_config(&workspace_root, config_path.as_deref())?;
        if overrides.global_dir.is_some() {
            config.agents.global_dir = overrides.global_dir;
        }
        if overrides.project_dir.is_some() {
            config.agents.project_dir = overrides.project_dir;
        }
        Ok(Self::with_config(workspace_root, config))
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: AgentScopeConfig) -> Self {
        let paths = ScopePaths::discover(&workspace_root, &config.agents);
        let settings = LoaderSettings::from(&config.agents);
        Self {
            workspace_root,
            config,
            settings,
            catalog: AgentCatalog::new(paths, settings),
        }
    }

    pub fn config(&self) -> &AgentScopeConfig {
        &self.config
    }

    pub fn paths(&self) -> &ScopePaths {
        self.catalog.paths()
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        debug!(command = command_name(command), "Executing command");
        match command {
            Commands::Validate { files, format } => self.handle_validate(files, format),
            Commands::Check { format, verbose } => self.handle_check(format, *verbose),
            Commands::List {
                format,
                tags,
                file,
            } => self.handle_list(format, tags, file.as_ref()),
            Commands::Show { name, format } => self.handle_show(name, format),
            Commands::Paths { format } => self.handle_paths(format),
        }
    }

    fn handle_validate(&self, files: &[PathBuf], format: &str) -> Result<CommandOutput, ApiError> {
        let reports: Vec<FileReport> = files
            .iter()
            .map(|path| FileReport {
                path: path.clone(),
                outcome: scope::load_file_with(path, &self.settings),
            })
            .collect();
        let success = reports.iter().all(FileReport::is_valid);
        info!(
            files = reports.len(),
            valid = reports.iter().filter(|r| r.is_valid()).count(),
            "Validated agent files"
        );

        let text = match format {
            "json" => format_file_reports_json(&reports)?,
            _ => format_file_reports_text(&reports),
        };
        Ok(CommandOutput { text, success })
    }

    fn handle_check(&self, format: &str, verbose: bool) -> Result<CommandOutput, ApiError> {
        let resolution = self.catalog.reload()?;
        info!(summary = %resolution.summary(), "Checked agent scopes");
        let text = match format {
            "json" => format_check_json(self.paths(), &resolution)?,
            _ => format_check_text(self.paths(), &resolution, verbose),
        };
        Ok(CommandOutput {
            text,
            success: resolution.is_clean(),
        })
    }

    fn handle_list(
        &self,
        format: &str,
        tags: &[String],
        file: Option<&PathBuf>,
    ) -> Result<CommandOutput, ApiError> {
        self.catalog.reload()?;
        let mut agents: Vec<ScopedAgent> = if tags.is_empty() {
            self.catalog.snapshot().agents.values().cloned().collect()
        } else {
            self.catalog.agents_with_tags(tags)
        };
        if let Some(file) = file {
            agents.retain(|agent| agent.config.matches_file(file));
        }

        let text = match format {
            "json" => format_agent_list_json(&agents)?,
            _ => format_agent_list_text(&agents),
        };
        Ok(CommandOutput::ok(text))
    }

    fn handle_show(&self, name: &str, format: &str) -> Result<CommandOutput, ApiError> {
        self.catalog.reload()?;
        let agent = self
            .catalog
            .get(name)
            .ok_or_else(|| ApiError::AgentNotFound(name.to_string()))?;
        let text = match format {
            "json" => format_agent_show_json(&agent)?,
            _ => format_agent_show_text(&agent),
        };
        Ok(CommandOutput::ok(text))
    }

    fn handle_paths(&self, format: &str) -> Result<CommandOutput, ApiError> {
        let mut config_files = Vec::new();
        if let Some(path) = global_config_path() {
            config_files.push(("global".to_string(), path));
        }
        config_files.push((
            "workspace".to_string(),
            workspace_config_path(&self.workspace_root),
        ));

        let text = match format {
            "json" => {
                let files: serde_json::Map<String, serde_json::Value> = config_files
                    .iter()
                    .map(|(label, path)| (label.clone(), json!(path.to_string_lossy())))
                    .collect();
                serde_json::to_string_pretty(&json!({
                    "agents": self.paths(),
                    "config_files": files,
                    "max_file_bytes": self.settings.max_file_bytes,
                }))?
            }
            _ => format_paths_text(self.paths(), &config_files),
        };
        Ok(CommandOutput::ok(text))
    }
}
