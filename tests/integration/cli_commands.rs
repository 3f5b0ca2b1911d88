//! Integration tests for CLI command execution

use agentscope::config::{AgentScopeConfig, AgentsConfig};
use agentscope::error::ApiError;
use agentscope::tooling::{Commands, RunContext};
use serde_json::Value;

use crate::integration::test_utils::minimal_yaml;
use crate::integration::AgentDirs;

fn context(dirs: &AgentDirs) -> RunContext {
    let config = AgentScopeConfig {
        agents: AgentsConfig {
            global_dir: Some(dirs.global.clone()),
            project_dir: Some(dirs.project.clone()),
            ..AgentsConfig::default()
        },
        ..AgentScopeConfig::default()
    };
    RunContext::with_config(dirs.workspace(), config)
}

fn seed(dirs: &AgentDirs) {
    dirs.write_global(
        "reviewer.yaml",
        "name: reviewer\ndescription: Global reviewer\nprompt: p\ntags: [review]\n",
    );
    dirs.write_global("planner.yaml", &minimal_yaml("planner"));
    dirs.write_project(
        "reviewer.toml",
        r#"
name = "reviewer"
description = "Project reviewer"
prompt = "Review this project."
intelligence = "hard"
tags = ["review", "rust"]
file_patterns = ["*.rs"]
"#,
    );
}

#[test]
fn test_check_reports_summary_and_failure() {
    let dirs = AgentDirs::new();
    seed(&dirs);
    dirs.write_project("broken.yaml", "name: broken\nprompt: p\n");

    let output = context(&dirs)
        .execute(&Commands::Check {
            format: "text".into(),
            verbose: true,
        })
        .unwrap();

    assert!(!output.success);
    assert!(output.text.contains("Summary: 2 valid, 1 invalid"));
    assert!(output.text.contains("broken.yaml"));
    assert!(output.text.contains("missing required field `description`"));
    assert!(output.text.contains("Overridden by project: reviewer"));
}

#[test]
fn test_check_clean_scopes_succeed() {
    let dirs = AgentDirs::new();
    seed(&dirs);

    let output = context(&dirs)
        .execute(&Commands::Check {
            format: "json".into(),
            verbose: false,
        })
        .unwrap();

    assert!(output.success);
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["valid"], 2);
    assert_eq!(value["invalid"], 0);
    assert_eq!(value["overridden"][0], "reviewer");
}

#[test]
fn test_check_fails_on_missing_directory() {
    let dirs = AgentDirs::new();
    std::fs::remove_dir_all(&dirs.global).unwrap();

    let err = context(&dirs)
        .execute(&Commands::Check {
            format: "text".into(),
            verbose: false,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Resolve(_)));
}

#[test]
fn test_validate_json_reports_each_file() {
    let dirs = AgentDirs::new();
    let good = dirs.write_project("good.yaml", &minimal_yaml("good"));
    let bad = dirs.write_project(
        "bad.yaml",
        "name: bad\ndescription: d\nprompt: p\nintelligence: genius\n",
    );

    let output = context(&dirs)
        .execute(&Commands::Validate {
            files: vec![good, bad],
            format: "json".into(),
        })
        .unwrap();

    assert!(!output.success);
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["valid"], 1);
    assert_eq!(value["invalid"], 1);
    assert_eq!(value["files"][0]["agent"], "good");
    assert_eq!(value["files"][1]["reason"]["kind"], "invalid");
    assert_eq!(
        value["files"][1]["reason"]["violations"][0]["kind"],
        "invalid_enum"
    );
}

#[test]
fn test_validate_text_for_unsupported_file() {
    let dirs = AgentDirs::new();
    let readme = dirs.write_project("README.md", "# agents\n");

    let output = context(&dirs)
        .execute(&Commands::Validate {
            files: vec![readme],
            format: "text".into(),
        })
        .unwrap();

    assert!(!output.success);
    assert!(output.text.contains("unsupported format"));
    assert!(output.text.contains("Summary: 0 valid, 1 invalid"));
}

#[test]
fn test_list_filters_by_tag_and_file() {
    let dirs = AgentDirs::new();
    seed(&dirs);
    let ctx = context(&dirs);

    let output = ctx
        .execute(&Commands::List {
            format: "json".into(),
            tags: vec!["rust".to_string()],
            file: None,
        })
        .unwrap();
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["total"], 1);
    assert_eq!(value["agents"][0]["name"], "reviewer");
    assert_eq!(value["agents"][0]["origin"], "project");

    let output = ctx
        .execute(&Commands::List {
            format: "json".into(),
            tags: Vec::new(),
            file: Some("docs/readme.md".into()),
        })
        .unwrap();
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["total"], 1);
    assert_eq!(value["agents"][0]["name"], "planner");
}

#[test]
fn test_list_text_renders_table() {
    let dirs = AgentDirs::new();
    seed(&dirs);

    let output = context(&dirs)
        .execute(&Commands::List {
            format: "text".into(),
            tags: Vec::new(),
            file: None,
        })
        .unwrap();
    assert!(output.success);
    assert!(output.text.contains("planner"));
    assert!(output.text.contains("reviewer"));
    assert!(output.text.contains("Total: 2 agent(s)"));
}

#[test]
fn test_show_known_and_unknown_agent() {
    let dirs = AgentDirs::new();
    seed(&dirs);
    let ctx = context(&dirs);

    let output = ctx
        .execute(&Commands::Show {
            name: "reviewer".to_string(),
            format: "json".into(),
        })
        .unwrap();
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["description"], "Project reviewer");
    assert_eq!(value["effective_intelligence"], "hard");

    let err = ctx
        .execute(&Commands::Show {
            name: "ghost".to_string(),
            format: "text".into(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::AgentNotFound(ref name) if name == "ghost"));
}

#[test]
fn test_paths_json_lists_directories() {
    let dirs = AgentDirs::new();

    let output = context(&dirs)
        .execute(&Commands::Paths {
            format: "json".into(),
        })
        .unwrap();
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(
        value["agents"]["project"],
        Value::from(dirs.project.to_string_lossy().to_string())
    );
    assert_eq!(value["max_file_bytes"], 1024 * 1024);
    assert!(value["config_files"]["workspace"]
        .as_str()
        .unwrap()
        .ends_with("config.toml"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_json_output_with_non_utf8_file_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dirs = AgentDirs::new();
    let valid = dirs.global.join(OsStr::from_bytes(b"odd\xff.yaml"));
    std::fs::write(&valid, minimal_yaml("odd")).unwrap();
    let broken = dirs.project.join(OsStr::from_bytes(b"bad\xfe.toml"));
    std::fs::write(&broken, "name = \n").unwrap();
    let ctx = context(&dirs);

    let output = ctx
        .execute(&Commands::List {
            format: "json".into(),
            tags: Vec::new(),
            file: None,
        })
        .unwrap();
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["agents"][0]["name"], "odd");
    assert!(value["agents"][0]["source"]
        .as_str()
        .unwrap()
        .ends_with("odd\u{fffd}.yaml"));

    let output = ctx
        .execute(&Commands::Check {
            format: "json".into(),
            verbose: false,
        })
        .unwrap();
    assert!(!output.success);
    let value: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["invalid"], 1);
    assert!(value["failures"][0]["path"]
        .as_str()
        .unwrap()
        .ends_with("bad\u{fffd}.toml"));
}
