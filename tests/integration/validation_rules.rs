//! Integration tests for schema validation of agent files on disk

use agentscope::agent::{IntelligenceLevel, Keyword, OperatingMode, ToolPermission};
use agentscope::document::{AgentDocument, Node};
use agentscope::format::Format;
use agentscope::schema::{validate, Violation};
use agentscope::scope::{load_file, validate_file, FileFailureReason};

use crate::integration::AgentDirs;

fn violations_of(result: Result<agentscope::AgentConfig, FileFailureReason>) -> Vec<Violation> {
    match result {
        Err(FileFailureReason::Invalid { violations }) => violations,
        other => panic!("expected schema violations, got {:?}", other),
    }
}

fn parse(format: Format, source: &str) -> AgentDocument {
    let node = format.adapter().parse(source.as_bytes()).unwrap();
    AgentDocument::from_node(node).unwrap()
}

#[test]
fn test_tool_with_unknown_permission_and_no_name() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project(
        "reviewer.yaml",
        r#"
name: reviewer
description: Reviews
prompt: Review.
tools:
  - permission: maybe
"#,
    );

    let violations = violations_of(load_file(&path));
    assert_eq!(
        violations,
        vec![
            Violation::missing("tools[0].name"),
            Violation::InvalidEnum {
                field: "tools[0].permission".to_string(),
                value: "maybe".to_string(),
                allowed: ToolPermission::ALLOWED,
            },
        ]
    );
}

#[test]
fn test_each_missing_required_field_is_reported_alone() {
    let dirs = AgentDirs::new();
    let fields = [
        ("name", "description: d\nprompt: p\n"),
        ("description", "name: n\nprompt: p\n"),
        ("prompt", "name: n\ndescription: d\n"),
    ];

    for (missing, body) in fields {
        let path = dirs.write_project(&format!("{}.yaml", missing), body);
        assert_eq!(
            violations_of(load_file(&path)),
            vec![Violation::missing(missing)],
            "document without `{}`",
            missing
        );
    }
}

#[test]
fn test_null_required_field_counts_as_missing() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project("null.yaml", "name: ~\ndescription: d\nprompt: p\n");
    assert_eq!(
        violations_of(load_file(&path)),
        vec![Violation::missing("name")]
    );
}

#[test]
fn test_blank_required_field_is_empty() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project("blank.toml", "name = \"  \"\ndescription = \"d\"\nprompt = \"p\"\n");
    assert_eq!(
        violations_of(load_file(&path)),
        vec![Violation::empty("name")]
    );
}

#[test]
fn test_invalid_mode_lists_allowed_values() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project(
        "mode.yaml",
        "name: n\ndescription: d\nprompt: p\nmode_override: ship\n",
    );

    let violations = violations_of(load_file(&path));
    assert_eq!(violations.len(), 1);
    match &violations[0] {
        Violation::InvalidEnum {
            field,
            value,
            allowed,
        } => {
            assert_eq!(field, "mode_override");
            assert_eq!(value, "ship");
            assert_eq!(*allowed, OperatingMode::ALLOWED);
        }
        other => panic!("unexpected violation {:?}", other),
    }
    assert_eq!(
        violations[0].to_string(),
        "invalid value `ship` for `mode_override`, expected one of: plan, build, review"
    );
}

#[test]
fn test_non_string_keywords_are_invalid_values() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project(
        "numeric.yaml",
        r#"
name: n
description: d
prompt: p
mode_override: 3
intelligence: true
tools:
  - name: shell
    permission: 1
"#,
    );

    assert_eq!(
        violations_of(load_file(&path)),
        vec![
            Violation::InvalidEnum {
                field: "mode_override".to_string(),
                value: "3".to_string(),
                allowed: OperatingMode::ALLOWED,
            },
            Violation::InvalidEnum {
                field: "intelligence".to_string(),
                value: "true".to_string(),
                allowed: IntelligenceLevel::ALLOWED,
            },
            Violation::InvalidEnum {
                field: "tools[0].permission".to_string(),
                value: "1".to_string(),
                allowed: ToolPermission::ALLOWED,
            },
        ]
    );
}

#[test]
fn test_restricted_tool_without_restrictions_is_valid() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project(
        "restricted.yaml",
        r#"
name: n
description: d
prompt: p
tools:
  - name: shell
    permission: restricted
"#,
    );

    let config = load_file(&path).unwrap();
    assert_eq!(config.tools[0].permission, Some(ToolPermission::Restricted));
    assert_eq!(config.tools[0].restrictions, None);
    assert!(config.is_tool_allowed("shell"));
    assert_eq!(config.tool_restrictions("shell"), Some(&[][..]));
}

#[test]
fn test_minimal_document_with_empty_lists_is_valid() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project(
        "empty-lists.toml",
        "name = \"n\"\ndescription = \"d\"\nprompt = \"p\"\ntools = []\nparameters = []\n",
    );

    assert!(validate_file(&path).is_ok());
    let config = load_file(&path).unwrap();
    assert!(config.tools.is_empty());
    assert!(config.parameters.is_empty());
    assert_eq!(config.effective_intelligence(), IntelligenceLevel::Medium);
}

#[test]
fn test_yaml_and_toml_produce_identical_configs() {
    let yaml = parse(
        Format::Yaml,
        r#"
name: reviewer
description: Reviews pull requests
prompt: |
  You review code.
mode_override: review
intelligence: hard
tools:
  - name: shell
    permission: restricted
    restrictions: ["git diff", "git log"]
  - name: browser
    permission: deny
parameters:
  - name: depth
    description: How deep to look
    required: true
    default: shallow
    valid_values: [shallow, deep]
tags: [review, quality]
file_patterns: ["*.rs", "src/"]
metadata:
  owner: platform
  priority: 2
"#,
    );
    let toml = parse(
        Format::Toml,
        r#"
name = "reviewer"
description = "Reviews pull requests"
prompt = """
You review code.
"""
mode_override = "review"
intelligence = "hard"
tags = ["review", "quality"]
file_patterns = ["*.rs", "src/"]

[[tools]]
name = "shell"
permission = "restricted"
restrictions = ["git diff", "git log"]

[[tools]]
name = "browser"
permission = "deny"

[[parameters]]
name = "depth"
description = "How deep to look"
required = true
default = "shallow"
valid_values = ["shallow", "deep"]

[metadata]
owner = "platform"
priority = 2
"#,
    );

    let from_yaml = validate(&yaml).unwrap();
    let from_toml = validate(&toml).unwrap();
    assert_eq!(from_yaml, from_toml);

    assert_eq!(from_yaml.mode_override, Some(OperatingMode::Review));
    assert!(!from_yaml.is_tool_allowed("browser"));
    assert_eq!(
        from_yaml.tool_restrictions("shell"),
        Some(&["git diff".to_string(), "git log".to_string()][..])
    );
    assert_eq!(from_yaml.parameters[0].default.as_deref(), Some("shallow"));
    assert!(from_yaml.matches_file(std::path::Path::new("crates/core/lib.rs")));
}

#[test]
fn test_restriction_mapping_is_flattened() {
    let doc = parse(
        Format::Toml,
        r#"
name = "n"
description = "d"
prompt = "p"

[[tools]]
name = "http"
permission = "restricted"

[tools.restrictions]
host = "example.com"
port = 443
"#,
    );

    let config = validate(&doc).unwrap();
    assert_eq!(
        config.tools[0].restrictions,
        Some(vec!["host=example.com".to_string(), "port=443".to_string()])
    );
}

#[test]
fn test_unknown_fields_are_ignored() {
    let doc = parse(
        Format::Yaml,
        "name: n\ndescription: d\nprompt: p\ncolor: blue\nextras: {nested: true}\n",
    );
    assert!(doc.extra.contains_key("color"));
    let config = validate(&doc).unwrap();
    assert_eq!(config.name, "n");
}

#[test]
fn test_violations_follow_field_order() {
    let doc = parse(
        Format::Yaml,
        r#"
prompt: 42
intelligence: genius
tags: [ok, 7]
parameters:
  - {name: a, description: first}
  - {name: a, description: second}
metadata: [not, a, map]
"#,
    );

    let fields: Vec<String> = validate(&doc)
        .unwrap_err()
        .iter()
        .map(|v| v.field().to_string())
        .collect();
    assert_eq!(
        fields,
        vec![
            "name",
            "description",
            "prompt",
            "intelligence",
            "parameters[1].name",
            "tags[1]",
            "metadata",
        ]
    );
}

#[test]
fn test_keywords_accept_any_case() {
    let doc = parse(
        Format::Yaml,
        "name: n\ndescription: d\nprompt: p\nmode_override: PLAN\nintelligence: Light\n",
    );
    let config = validate(&doc).unwrap();
    assert_eq!(config.mode_override, Some(OperatingMode::Plan));
    assert_eq!(config.intelligence, Some(IntelligenceLevel::Light));
    assert_eq!(
        config.effective_intelligence().compression_percentage(),
        70
    );
}

#[test]
fn test_non_mapping_root_is_a_parse_failure() {
    let dirs = AgentDirs::new();
    let path = dirs.write_project("list.yaml", "- a\n- b\n");
    assert!(matches!(
        load_file(&path),
        Err(FileFailureReason::Parse { .. })
    ));
}

#[test]
fn test_metadata_is_kept_verbatim() {
    let doc = parse(
        Format::Yaml,
        "name: n\ndescription: d\nprompt: p\nmetadata:\n  owner: team\n  retries: 3\n",
    );
    let config = validate(&doc).unwrap();
    let metadata = config.metadata.unwrap();
    assert_eq!(metadata["owner"], Node::from("team"));
    assert_eq!(metadata["retries"], Node::Integer(3));
}
