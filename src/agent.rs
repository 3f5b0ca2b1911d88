//! Agent Model
//!
//! The typed agent configuration produced by validation, the helpers that
//! answer questions about one agent, and the catalog that serves the merged
//! set to readers.

pub mod catalog;
pub mod patterns;
pub mod profile;

pub use catalog::AgentCatalog;
pub use profile::{
    AgentConfig, IntelligenceLevel, Keyword, OperatingMode, ParamSpec, ToolPermission, ToolSpec,
};
