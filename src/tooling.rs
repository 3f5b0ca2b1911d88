//! Tooling & Integration Layer
//!
//! The `agentscope` command line: argument parsing, command execution and
//! output rendering for terminals and CI.

pub mod cli;
pub mod presentation;

pub use cli::{map_error, Cli, CommandOutput, Commands, RunContext, ScopeOverrides};
