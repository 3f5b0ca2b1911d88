//! Scope Resolver
//!
//! Agents live in two directories: a global one shared by every workspace
//! and a project one inside the workspace. Both are scanned, every file is
//! loaded and validated on its own, and the results are merged by agent
//! name with project agents replacing global ones.

pub mod paths;
pub mod report;
pub mod resolver;

pub use paths::{LoaderSettings, ScopePaths};
pub use report::{FileFailure, FileFailureReason, Resolution, ScopedAgent};
pub use resolver::{load_file, load_file_with, resolve, source_times, validate_file};

use serde::Serialize;
use std::fmt;

/// Where an agent definition was found. Later scopes take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Project,
}

impl Scope {
    /// Scopes in merge order, lowest precedence first.
    pub const ALL: [Scope; 2] = [Scope::Global, Scope::Project];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Project => "project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
