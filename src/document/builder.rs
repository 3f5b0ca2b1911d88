//! Builds an [`AgentDocument`] from a parsed tree.

use super::node::Node;
use crate::format::ParseError;
use std::collections::BTreeMap;

/// One agent file after parsing, before validation.
///
/// Every known field keeps its raw node so the validator can tell "absent"
/// (`None`) apart from "present but empty" (`Some`). A key written without a
/// value (YAML `name:`) parses to null and is treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentDocument {
    pub name: Option<Node>,
    pub description: Option<Node>,
    pub prompt: Option<Node>,
    pub mode_override: Option<Node>,
    pub intelligence: Option<Node>,
    pub tools: Option<Node>,
    pub parameters: Option<Node>,
    pub tags: Option<Node>,
    pub file_patterns: Option<Node>,
    pub metadata: Option<Node>,
    /// Unrecognized top-level keys, kept for diagnostics only.
    pub extra: BTreeMap<String, Node>,
}

impl AgentDocument {
    /// Build a document from a tree; the root must be a mapping.
    pub fn from_node(root: Node) -> Result<Self, ParseError> {
        let map = match root {
            Node::Mapping(map) => map,
            other => {
                return Err(ParseError::new(format!(
                    "agent document must be a mapping at the top level, found {}",
                    other.kind()
                )))
            }
        };

        let mut doc = AgentDocument::default();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            let slot = match key.as_str() {
                "name" => Some(&mut doc.name),
                "description" => Some(&mut doc.description),
                "prompt" => Some(&mut doc.prompt),
                "mode_override" => Some(&mut doc.mode_override),
                "intelligence" => Some(&mut doc.intelligence),
                "tools" => Some(&mut doc.tools),
                "parameters" => Some(&mut doc.parameters),
                "tags" => Some(&mut doc.tags),
                "file_patterns" => Some(&mut doc.file_patterns),
                "metadata" => Some(&mut doc.metadata),
                _ => None,
            };
            match slot {
                Some(slot) => *slot = Some(value),
                None => {
                    doc.extra.insert(key, value);
                }
            }
        }
        Ok(doc)
    }

    /// Raw node for a top-level field by its schema name.
    pub fn field(&self, name: &str) -> Option<&Node> {
        match name {
            "name" => self.name.as_ref(),
            "description" => self.description.as_ref(),
            "prompt" => self.prompt.as_ref(),
            "mode_override" => self.mode_override.as_ref(),
            "intelligence" => self.intelligence.as_ref(),
            "tools" => self.tools.as_ref(),
            "parameters" => self.parameters.as_ref(),
            "tags" => self.tags.as_ref(),
            "file_patterns" => self.file_patterns.as_ref(),
            "metadata" => self.metadata.as_ref(),
            _ => self.extra.get(name),
        }
    }

    /// Declared agent name, if it is a string.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Node::as_str)
    }
}
