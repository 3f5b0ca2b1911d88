//! Resolution output: merged agents plus per-file diagnostics.

use super::Scope;
use crate::agent::AgentConfig;
use crate::format::ParseError;
use crate::schema::Violation;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Paths serialize as text, with bytes that are not UTF-8 replaced.
pub(crate) fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

pub(crate) fn serialize_opt_path<S: Serializer>(
    path: &Option<PathBuf>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match path {
        Some(path) => serialize_path(path, serializer),
        None => serializer.serialize_none(),
    }
}

/// A validated agent together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopedAgent {
    #[serde(flatten)]
    pub config: AgentConfig,
    pub origin: Scope,
    #[serde(serialize_with = "serialize_path")]
    pub source: PathBuf,
}

/// Why a file was excluded from the merged mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileFailureReason {
    Unreadable { message: String },
    TooLarge { size: u64, limit: u64 },
    Parse { error: ParseError },
    Invalid { violations: Vec<Violation> },
    DuplicateName {
        name: String,
        #[serde(serialize_with = "serialize_path")]
        first: PathBuf,
    },
    UnsupportedFormat,
}

impl FileFailureReason {
    /// Every problem as its own line of text.
    pub fn details(&self) -> Vec<String> {
        match self {
            FileFailureReason::Invalid { violations } => {
                violations.iter().map(ToString::to_string).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for FileFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFailureReason::Unreadable { message } => write!(f, "unreadable: {}", message),
            FileFailureReason::TooLarge { size, limit } => {
                write!(f, "file is {} bytes, limit is {}", size, limit)
            }
            FileFailureReason::Parse { error } => write!(f, "parse error: {}", error),
            FileFailureReason::Invalid { violations } => {
                write!(f, "{} violation(s)", violations.len())
            }
            FileFailureReason::DuplicateName { name, first } => write!(
                f,
                "agent `{}` is already defined by {}",
                name,
                first.display()
            ),
            FileFailureReason::UnsupportedFormat => {
                f.write_str("unsupported format (expected .yaml, .yml or .toml)")
            }
        }
    }
}

/// One file excluded during resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub scope: Scope,
    pub reason: FileFailureReason,
}

/// Result of resolving both scopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub agents: BTreeMap<String, ScopedAgent>,
    pub failures: Vec<FileFailure>,
    /// Global agent names replaced by a project agent.
    pub overridden: Vec<String>,
    /// Every agent file scanned, valid or not, with its modification time.
    #[serde(skip)]
    pub sources: BTreeMap<PathBuf, Option<SystemTime>>,
}

impl Resolution {
    pub fn valid_count(&self) -> usize {
        self.agents.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// `N valid, M invalid`
    pub fn summary(&self) -> String {
        format!(
            "{} valid, {} invalid",
            self.valid_count(),
            self.invalid_count()
        )
    }
}
