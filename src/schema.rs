//! Schema Validator
//!
//! Checks an [`AgentDocument`] against the agent schema and, when every rule
//! holds, produces the typed [`AgentConfig`]. All violations are collected
//! in one pass; validation never stops at the first problem.

pub mod rules;
pub mod violation;

pub use rules::{FieldRule, AGENT_FIELDS};
pub use violation::Violation;

use crate::agent::{AgentConfig, Keyword, ParamSpec, ToolSpec};
use crate::document::{AgentDocument, Node};
use rules::present;
use std::collections::BTreeMap;

/// Validate a document.
///
/// Violations are reported in field-table order, and within a list in
/// element order.
pub fn validate(doc: &AgentDocument) -> Result<AgentConfig, Vec<Violation>> {
    let mut violations = Vec::new();
    for rule in AGENT_FIELDS {
        match doc.field(rule.name) {
            Some(node) => (rule.check)(node, rule.name, &mut violations),
            None if rule.required => violations.push(Violation::missing(rule.name)),
            None => {}
        }
    }

    if violations.is_empty() {
        Ok(build(doc))
    } else {
        Err(violations)
    }
}

// Extraction below runs only on documents that passed every rule, so the
// fallbacks are never taken for fields the rules cover.

fn build(doc: &AgentDocument) -> AgentConfig {
    AgentConfig {
        name: text(doc.name.as_ref()),
        description: text(doc.description.as_ref()),
        prompt: text(doc.prompt.as_ref()),
        mode_override: keyword(doc.mode_override.as_ref()),
        intelligence: keyword(doc.intelligence.as_ref()),
        tools: entries(doc.tools.as_ref(), tool_spec),
        parameters: entries(doc.parameters.as_ref(), param_spec),
        tags: string_list(doc.tags.as_ref()),
        file_patterns: string_list(doc.file_patterns.as_ref()),
        metadata: doc.metadata.as_ref().and_then(Node::as_mapping).cloned(),
    }
}

fn text(node: Option<&Node>) -> String {
    node.and_then(Node::as_str).unwrap_or_default().to_string()
}

fn keyword<K: Keyword>(node: Option<&Node>) -> Option<K> {
    node.and_then(Node::as_str).and_then(K::from_keyword)
}

fn string_list(node: Option<&Node>) -> Option<Vec<String>> {
    node.and_then(Node::as_sequence).map(|items| {
        items
            .iter()
            .filter_map(Node::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn entries<T>(node: Option<&Node>, extract: fn(&BTreeMap<String, Node>) -> T) -> Vec<T> {
    node.and_then(Node::as_sequence)
        .map(|items| {
            items
                .iter()
                .filter_map(Node::as_mapping)
                .map(extract)
                .collect()
        })
        .unwrap_or_default()
}

fn tool_spec(entry: &BTreeMap<String, Node>) -> ToolSpec {
    ToolSpec {
        name: text(present(entry, "name")),
        permission: keyword(present(entry, "permission")),
        restrictions: present(entry, "restrictions").map(normalize_restrictions),
    }
}

/// Flatten restrictions to strings; a mapping becomes `key=value` entries in
/// key order.
fn normalize_restrictions(node: &Node) -> Vec<String> {
    match node {
        Node::Sequence(items) => items.iter().filter_map(Node::scalar_text).collect(),
        Node::Mapping(map) => map
            .iter()
            .filter_map(|(key, value)| Some(format!("{}={}", key, value.scalar_text()?)))
            .collect(),
        _ => Vec::new(),
    }
}

fn param_spec(entry: &BTreeMap<String, Node>) -> ParamSpec {
    ParamSpec {
        name: text(present(entry, "name")),
        description: text(present(entry, "description")),
        required: present(entry, "required")
            .and_then(Node::as_bool)
            .unwrap_or(false),
        default: present(entry, "default").and_then(Node::scalar_text),
        valid_values: present(entry, "valid_values")
            .and_then(Node::as_sequence)
            .map(|items| items.iter().filter_map(Node::scalar_text).collect()),
    }
}
