//! Agent profile: the validated, typed shape of one agent configuration.

use crate::document::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Closed keyword sets accepted by the schema.
///
/// Matching is ASCII case-insensitive; `ALLOWED` lists the canonical
/// spellings reported in violations.
pub trait Keyword: Sized + Copy + 'static {
    const ALLOWED: &'static [&'static str];

    fn from_keyword(value: &str) -> Option<Self>;

    fn keyword(self) -> &'static str;
}

/// Operating mode an agent switches to while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Plan,
    Build,
    Review,
}

impl Keyword for OperatingMode {
    const ALLOWED: &'static [&'static str] = &["plan", "build", "review"];

    fn from_keyword(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "plan" => Some(OperatingMode::Plan),
            "build" => Some(OperatingMode::Build),
            "review" => Some(OperatingMode::Review),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            OperatingMode::Plan => "plan",
            OperatingMode::Build => "build",
            OperatingMode::Review => "review",
        }
    }
}

/// Intelligence tier for context processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntelligenceLevel {
    /// Fast, minimal resources
    Light,
    /// Balanced
    #[default]
    Medium,
    /// Maximum context
    Hard,
}

impl IntelligenceLevel {
    /// Compression level as a percentage
    pub const fn compression_percentage(self) -> u8 {
        match self {
            Self::Light => 70,
            Self::Medium => 85,
            Self::Hard => 95,
        }
    }

    pub const fn chunk_size(self) -> usize {
        match self {
            Self::Light => 256,
            Self::Medium => 512,
            Self::Hard => 1024,
        }
    }

    pub const fn max_chunks(self) -> usize {
        match self {
            Self::Light => 1_000,
            Self::Medium => 10_000,
            Self::Hard => 100_000,
        }
    }
}

impl Keyword for IntelligenceLevel {
    const ALLOWED: &'static [&'static str] = &["light", "medium", "hard"];

    fn from_keyword(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "light" => Some(IntelligenceLevel::Light),
            "medium" => Some(IntelligenceLevel::Medium),
            "hard" => Some(IntelligenceLevel::Hard),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            IntelligenceLevel::Light => "light",
            IntelligenceLevel::Medium => "medium",
            IntelligenceLevel::Hard => "hard",
        }
    }
}

/// Permission granted to a single tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolPermission {
    Allow,
    Deny,
    Restricted,
}

impl Keyword for ToolPermission {
    const ALLOWED: &'static [&'static str] = &["allow", "deny", "restricted"];

    fn from_keyword(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "allow" => Some(ToolPermission::Allow),
            "deny" => Some(ToolPermission::Deny),
            "restricted" => Some(ToolPermission::Restricted),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            ToolPermission::Allow => "allow",
            ToolPermission::Deny => "deny",
            ToolPermission::Restricted => "restricted",
        }
    }
}

macro_rules! display_keyword {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.keyword())
            }
        })*
    };
}

display_keyword!(OperatingMode, IntelligenceLevel, ToolPermission);

/// One entry of the `tools` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<ToolPermission>,
    /// Only meaningful when `permission` is `restricted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Vec<String>>,
}

impl ToolSpec {
    /// Restrictions that are in effect; empty unless the tool is restricted.
    pub fn effective_restrictions(&self) -> &[String] {
        match (self.permission, &self.restrictions) {
            (Some(ToolPermission::Restricted), Some(list)) => list,
            _ => &[],
        }
    }
}

/// One entry of the `parameters` list.
///
/// Only `name` and `description` are validated; the remaining fields are
/// read when present with the expected type and otherwise left unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<String>>,
}

/// A fully validated agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentConfig {
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub mode_override: Option<OperatingMode>,
    pub intelligence: Option<IntelligenceLevel>,
    pub tools: Vec<ToolSpec>,
    pub parameters: Vec<ParamSpec>,
    pub tags: Option<Vec<String>>,
    pub file_patterns: Option<Vec<String>>,
    pub metadata: Option<BTreeMap<String, Node>>,
}

impl AgentConfig {
    /// Intelligence tier in effect (`medium` when unset).
    pub fn effective_intelligence(&self) -> IntelligenceLevel {
        self.intelligence.unwrap_or_default()
    }

    /// The mode to run in, given the caller's current mode.
    pub fn effective_mode(&self, current: OperatingMode) -> OperatingMode {
        self.mode_override.unwrap_or(current)
    }

    pub fn tool(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Tools are allowed unless explicitly denied.
    pub fn is_tool_allowed(&self, name: &str) -> bool {
        !matches!(
            self.tool(name).and_then(|tool| tool.permission),
            Some(ToolPermission::Deny)
        )
    }

    /// Restriction list for a tool whose permission is `restricted`.
    pub fn tool_restrictions(&self, name: &str) -> Option<&[String]> {
        let tool = self.tool(name)?;
        match tool.permission {
            Some(ToolPermission::Restricted) => {
                Some(tool.restrictions.as_deref().unwrap_or_default())
            }
            _ => None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .map(|tags| tags.iter().any(|t| t == tag))
            .unwrap_or(false)
    }

    /// Whether this agent applies to `path` according to `file_patterns`.
    ///
    /// Agents without patterns apply to every file.
    pub fn matches_file(&self, path: &Path) -> bool {
        match self.file_patterns.as_deref() {
            None | Some([]) => true,
            Some(patterns) => patterns
                .iter()
                .any(|pattern| super::patterns::matches(pattern, path)),
        }
    }
}
