//! Document Model
//!
//! The generic tree every format adapter produces, and the per-agent document
//! built from it. Nothing here knows about YAML or TOML.

pub mod builder;
pub mod node;

pub use builder::AgentDocument;
pub use node::{Node, NodeKind};
