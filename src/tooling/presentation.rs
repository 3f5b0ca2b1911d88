//! CLI presentation: text and JSON renderings of command results.

use crate::agent::AgentConfig;
use crate::error::ApiError;
use crate::scope::{FileFailureReason, Resolution, ScopePaths, ScopedAgent};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Outcome of validating one file named on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<AgentConfig, FileFailureReason>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_json(value: &serde_json::Value) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn display_dir(dir: Option<&Path>) -> String {
    dir.map(|d| d.display().to_string())
        .unwrap_or_else(|| "(none)".to_string())
}

fn push_details(out: &mut String, reason: &FileFailureReason) {
    for line in reason.details() {
        out.push_str(&format!("    - {}\n", line));
    }
}

pub fn format_file_reports_text(reports: &[FileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        match &report.outcome {
            Ok(config) => out.push_str(&format!(
                "✓ {}: valid (agent '{}')\n",
                report.path.display(),
                config.name
            )),
            Err(reason) => {
                out.push_str(&format!("✗ {}: {}\n", report.path.display(), reason));
                if matches!(reason, FileFailureReason::Invalid { .. }) {
                    push_details(&mut out, reason);
                }
            }
        }
    }
    let valid = reports.iter().filter(|r| r.is_valid()).count();
    out.push_str(&format!(
        "\nSummary: {} valid, {} invalid\n",
        valid,
        reports.len() - valid
    ));
    out
}

pub fn format_file_reports_json(reports: &[FileReport]) -> Result<String, ApiError> {
    let files: Vec<_> = reports
        .iter()
        .map(|report| match &report.outcome {
            Ok(config) => json!({
                "path": report.path.to_string_lossy(),
                "valid": true,
                "agent": config.name,
            }),
            Err(reason) => json!({
                "path": report.path.to_string_lossy(),
                "valid": false,
                "reason": reason,
            }),
        })
        .collect();
    let valid = reports.iter().filter(|r| r.is_valid()).count();
    to_json(&json!({
        "files": files,
        "valid": valid,
        "invalid": reports.len() - valid,
    }))
}

/// Resolution summary; per invalid file every problem is listed.
pub fn format_check_text(paths: &ScopePaths, resolution: &Resolution, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Agent scopes")));
    out.push_str(&format!("  global:  {}\n", display_dir(paths.global.as_deref())));
    out.push_str(&format!("  project: {}\n\n", display_dir(paths.project.as_deref())));

    if verbose {
        for agent in resolution.agents.values() {
            out.push_str(&format!(
                "✓ {} ({}, {})\n",
                agent.config.name,
                agent.origin,
                agent.source.display()
            ));
        }
    }
    for failure in &resolution.failures {
        out.push_str(&format!(
            "✗ {} ({}): {}\n",
            failure.path.display(),
            failure.scope,
            failure.reason
        ));
        if matches!(failure.reason, FileFailureReason::Invalid { .. }) {
            push_details(&mut out, &failure.reason);
        }
    }
    if !resolution.overridden.is_empty() {
        out.push_str(&format!(
            "\nOverridden by project: {}\n",
            resolution.overridden.join(", ")
        ));
    }

    out.push_str(&format!("\nSummary: {}\n", resolution.summary()));
    out
}

pub fn format_check_json(paths: &ScopePaths, resolution: &Resolution) -> Result<String, ApiError> {
    let agents: Vec<_> = resolution
        .agents
        .values()
        .map(|agent| {
            json!({
                "name": agent.config.name,
                "origin": agent.origin,
                "source": agent.source.to_string_lossy(),
            })
        })
        .collect();
    to_json(&json!({
        "paths": paths,
        "agents": agents,
        "failures": resolution.failures,
        "overridden": resolution.overridden,
        "valid": resolution.valid_count(),
        "invalid": resolution.invalid_count(),
    }))
}

pub fn format_agent_list_text(agents: &[ScopedAgent]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Agents")));
    if agents.is_empty() {
        out.push_str("No agents found.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Origin", "Mode", "Intelligence", "Tools", "Source"]);
    for agent in agents {
        let config = &agent.config;
        table.add_row(vec![
            config.name.clone(),
            agent.origin.to_string(),
            config
                .mode_override
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            config.effective_intelligence().to_string(),
            config.tools.len().to_string(),
            agent.source.display().to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out.push_str(&format!("\nTotal: {} agent(s)\n", agents.len()));
    out
}

pub fn format_agent_list_json(agents: &[ScopedAgent]) -> Result<String, ApiError> {
    to_json(&json!({ "agents": agents, "total": agents.len() }))
}

pub fn format_agent_show_text(agent: &ScopedAgent) -> String {
    let config = &agent.config;
    let level = config.effective_intelligence();
    let mut out = format!("{}\n", format_section_heading(&format!("Agent: {}", config.name)));
    out.push_str(&format!("Origin: {}\n", agent.origin));
    out.push_str(&format!("Source: {}\n", agent.source.display()));
    out.push_str(&format!("Description: {}\n", config.description));
    out.push_str(&format!(
        "Mode override: {}\n",
        config
            .mode_override
            .map(|m| m.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    ));
    out.push_str(&format!(
        "Intelligence: {}{} (compression {}%, chunk size {}, max chunks {})\n",
        level,
        if config.intelligence.is_none() { " [default]" } else { "" },
        level.compression_percentage(),
        level.chunk_size(),
        level.max_chunks()
    ));

    if !config.tools.is_empty() {
        out.push_str("Tools:\n");
        for tool in &config.tools {
            let permission = tool
                .permission
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unset".to_string());
            let restrictions = tool.effective_restrictions();
            if restrictions.is_empty() {
                out.push_str(&format!("  - {}: {}\n", tool.name, permission));
            } else {
                out.push_str(&format!(
                    "  - {}: {} [{}]\n",
                    tool.name,
                    permission,
                    restrictions.join(", ")
                ));
            }
        }
    }
    if !config.parameters.is_empty() {
        out.push_str("Parameters:\n");
        for param in &config.parameters {
            let mut line = format!("  - {}", param.name);
            if param.required {
                line.push_str(" (required)");
            }
            line.push_str(&format!(": {}", param.description));
            if let Some(default) = &param.default {
                line.push_str(&format!(" [default: {}]", default));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    if let Some(tags) = &config.tags {
        out.push_str(&format!("Tags: {}\n", tags.join(", ")));
    }
    if let Some(patterns) = &config.file_patterns {
        out.push_str(&format!("File patterns: {}\n", patterns.join(", ")));
    }
    out.push_str("\nPrompt:\n");
    out.push_str(&config.prompt);
    out
}

pub fn format_agent_show_json(agent: &ScopedAgent) -> Result<String, ApiError> {
    let mut value = serde_json::to_value(agent)?;
    value["effective_intelligence"] = json!(agent.config.effective_intelligence());
    to_json(&value)
}

pub fn format_paths_text(paths: &ScopePaths, config_files: &[(String, PathBuf)]) -> String {
    let mut out = format!("{}\n", format_section_heading("Agent directories"));
    out.push_str(&format!("  global:  {}\n", display_dir(paths.global.as_deref())));
    out.push_str(&format!("  project: {}\n", display_dir(paths.project.as_deref())));
    out.push_str(&format!("\n{}\n", format_section_heading("Config files")));
    for (label, path) in config_files {
        let state = if path.is_file() { "" } else { " (missing)" };
        out.push_str(&format!("  {}: {}{}\n", label, path.display(), state));
    }
    out
}
