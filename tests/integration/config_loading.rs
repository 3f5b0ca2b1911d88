//! Integration tests for layered configuration loading

use agentscope::config::{global_config_path, workspace_config_path, ConfigLoader};
use agentscope::error::ApiError;
use agentscope::scope::ScopePaths;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::integration::test_utils::write_file;
use crate::integration::with_xdg_env;

#[test]
fn test_defaults_without_any_config_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let workspace = test_dir.path().join("ws");
        std::fs::create_dir_all(&workspace).unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.agents.max_file_bytes, 1024 * 1024);
        assert!(config.agents.follow_links);
        assert_eq!(config.agents.global_dir, None);
        assert_eq!(config.logging.level, "info");
    });
}

#[test]
fn test_global_config_file_is_read_from_xdg() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        assert_eq!(
            global_config_path(),
            Some(test_dir.path().join("agentscope").join("config.toml"))
        );
        write_file(
            test_dir.path(),
            "agentscope/config.toml",
            "[agents]\nglobal_dir = \"/srv/agents\"\nmax_file_bytes = 4096\n\n[logging]\nlevel = \"warn\"\n",
        );

        let workspace = test_dir.path().join("ws");
        std::fs::create_dir_all(&workspace).unwrap();
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.agents.global_dir, Some(PathBuf::from("/srv/agents")));
        assert_eq!(config.agents.max_file_bytes, 4096);
        assert_eq!(config.logging.level, "warn");
    });
}

#[test]
fn test_workspace_config_overrides_global() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        write_file(
            test_dir.path(),
            "agentscope/config.toml",
            "[agents]\nmax_file_bytes = 4096\nproject_dir = \"global-choice\"\n",
        );
        let workspace = test_dir.path().join("ws");
        let ws_config = workspace_config_path(&workspace);
        assert_eq!(ws_config, workspace.join(".agentscope").join("config.toml"));
        write_file(
            &workspace,
            ".agentscope/config.toml",
            "[agents]\nproject_dir = \"agents\"\n",
        );

        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.agents.max_file_bytes, 4096);
        assert_eq!(config.agents.project_dir, Some(PathBuf::from("agents")));

        let paths = ScopePaths::discover(&workspace, &config.agents);
        assert_eq!(
            paths.project,
            Some(dunce::canonicalize(&workspace).unwrap().join("agents"))
        );
    });
}

#[test]
fn test_environment_overrides_files() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let workspace = test_dir.path().join("ws");
        write_file(
            &workspace,
            ".agentscope/config.toml",
            "[agents]\nfollow_links = true\n",
        );
        std::env::set_var("AGENTSCOPE__AGENTS__FOLLOW_LINKS", "false");

        let config = ConfigLoader::load(&workspace).unwrap();
        assert!(!config.agents.follow_links);
    });
}

#[test]
fn test_invalid_values_are_rejected() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let workspace = test_dir.path().join("ws");
        write_file(
            &workspace,
            ".agentscope/config.toml",
            "[agents]\nmax_file_bytes = 0\n",
        );

        let err = ConfigLoader::load(&workspace).unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(ref msg) if msg.contains("max_file_bytes")));
    });
}

#[test]
fn test_load_from_explicit_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let path = write_file(
            test_dir.path(),
            "custom.toml",
            "[agents]\nglobal_dir = \"/opt/agents\"\nfollow_links = false\n",
        );

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.agents.global_dir, Some(PathBuf::from("/opt/agents")));
        assert!(!config.agents.follow_links);

        let missing = test_dir.path().join("nope.toml");
        let err = ConfigLoader::load_from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    });
}
