//! Declarative field table for agent documents.
//!
//! Each top-level field is described once: whether it is required and which
//! check applies when it is present. Nested checks report violations with a
//! full path such as `tools[1].permission`.

use super::Violation;
use crate::agent::{IntelligenceLevel, Keyword, OperatingMode, ToolPermission};
use crate::document::Node;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// Check applied to a present (non-null) field.
pub type FieldCheck = fn(&Node, &str, &mut Vec<Violation>);

/// Rule for one top-level field.
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub check: FieldCheck,
}

/// Fields in the order they are checked and reported.
pub const AGENT_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "name",
        required: true,
        check: check_text,
    },
    FieldRule {
        name: "description",
        required: true,
        check: check_text,
    },
    FieldRule {
        name: "prompt",
        required: true,
        check: check_text,
    },
    FieldRule {
        name: "mode_override",
        required: false,
        check: check_keyword::<OperatingMode>,
    },
    FieldRule {
        name: "intelligence",
        required: false,
        check: check_keyword::<IntelligenceLevel>,
    },
    FieldRule {
        name: "tools",
        required: false,
        check: check_tools,
    },
    FieldRule {
        name: "parameters",
        required: false,
        check: check_parameters,
    },
    FieldRule {
        name: "tags",
        required: false,
        check: check_string_list,
    },
    FieldRule {
        name: "file_patterns",
        required: false,
        check: check_string_list,
    },
    FieldRule {
        name: "metadata",
        required: false,
        check: check_mapping,
    },
];

/// Non-null value of a nested key.
pub(crate) fn present<'a>(map: &'a BTreeMap<String, Node>, key: &str) -> Option<&'a Node> {
    map.get(key).filter(|node| !node.is_null())
}

fn mismatch(field: &str, expected: &'static str, node: &Node) -> Violation {
    Violation::TypeMismatch {
        field: field.to_string(),
        expected,
        found: node.kind().as_str(),
    }
}

/// Non-blank string.
pub fn check_text(node: &Node, field: &str, out: &mut Vec<Violation>) {
    match node.as_str() {
        Some(text) if text.trim().is_empty() => out.push(Violation::empty(field)),
        Some(_) => {}
        None => out.push(mismatch(field, "string", node)),
    }
}

/// String naming one member of a keyword set.
/// Any scalar outside the keyword set, numbers and booleans included, is an
/// `InvalidEnum`; only collections are a type mismatch.
pub fn check_keyword<K: Keyword>(node: &Node, field: &str, out: &mut Vec<Violation>) {
    if node.as_str().is_some_and(|value| K::from_keyword(value).is_some()) {
        return;
    }
    match node.scalar_text() {
        Some(value) => out.push(Violation::InvalidEnum {
            field: field.to_string(),
            value,
            allowed: K::ALLOWED,
        }),
        None => out.push(mismatch(field, "string", node)),
    }
}

pub fn check_string_list(node: &Node, field: &str, out: &mut Vec<Violation>) {
    let Some(items) = node.as_sequence() else {
        out.push(mismatch(field, "sequence", node));
        return;
    };
    for (idx, item) in items.iter().enumerate() {
        if item.as_str().is_none() {
            out.push(mismatch(&format!("{}[{}]", field, idx), "string", item));
        }
    }
}

pub fn check_mapping(node: &Node, field: &str, out: &mut Vec<Violation>) {
    if node.as_mapping().is_none() {
        out.push(mismatch(field, "mapping", node));
    }
}

fn check_tools(node: &Node, field: &str, out: &mut Vec<Violation>) {
    let Some(items) = node.as_sequence() else {
        out.push(mismatch(field, "sequence", node));
        return;
    };
    for (idx, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", field, idx);
        let Some(entry) = item.as_mapping() else {
            out.push(mismatch(&path, "mapping", item));
            continue;
        };

        let name_path = format!("{}.name", path);
        match present(entry, "name") {
            Some(name) => check_text(name, &name_path, out),
            None => out.push(Violation::missing(name_path)),
        }
        if let Some(permission) = present(entry, "permission") {
            check_keyword::<ToolPermission>(permission, &format!("{}.permission", path), out);
        }
        if let Some(restrictions) = present(entry, "restrictions") {
            check_restrictions(restrictions, &format!("{}.restrictions", path), out);
        }
    }
}

/// Restrictions are a list of scalars, or a mapping of scalars that is
/// later flattened to `key=value` entries.
fn check_restrictions(node: &Node, field: &str, out: &mut Vec<Violation>) {
    match node {
        Node::Sequence(items) => {
            for (idx, item) in items.iter().enumerate() {
                if item.scalar_text().is_none() {
                    out.push(mismatch(&format!("{}[{}]", field, idx), "string", item));
                }
            }
        }
        Node::Mapping(map) => {
            for (key, value) in map {
                if value.scalar_text().is_none() {
                    out.push(mismatch(&format!("{}.{}", field, key), "string", value));
                }
            }
        }
        other => out.push(mismatch(field, "sequence", other)),
    }
}

fn check_parameters(node: &Node, field: &str, out: &mut Vec<Violation>) {
    let Some(items) = node.as_sequence() else {
        out.push(mismatch(field, "sequence", node));
        return;
    };
    let mut seen = HashSet::new();
    for (idx, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", field, idx);
        let Some(entry) = item.as_mapping() else {
            out.push(mismatch(&path, "mapping", item));
            continue;
        };

        let name_path = format!("{}.name", path);
        match present(entry, "name") {
            Some(name) => {
                check_text(name, &name_path, out);
                if let Some(text) = name.as_str().filter(|t| !t.trim().is_empty()) {
                    if !seen.insert(text) {
                        out.push(Violation::DuplicateEntry {
                            field: name_path,
                            value: text.to_string(),
                        });
                    }
                }
            }
            None => out.push(Violation::missing(name_path)),
        }

        let description_path = format!("{}.description", path);
        match present(entry, "description") {
            Some(description) => check_text(description, &description_path, out),
            None => out.push(Violation::missing(description_path)),
        }
    }
}
