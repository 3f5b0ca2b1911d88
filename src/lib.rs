//! agentscope: validation and layered loading of agent configurations.
//!
//! Agent definitions are YAML or TOML files kept in a global directory and
//! a project directory. Each file is parsed into a generic [`document::Node`]
//! tree, checked against the agent schema, and merged by name with project
//! definitions replacing global ones.
//!
//! ```no_run
//! use agentscope::scope::{resolve, LoaderSettings, ScopePaths};
//!
//! let paths = ScopePaths::new(None, Some(".agentscope/agents".into()));
//! let resolution = resolve(&paths, &LoaderSettings::default())?;
//! println!("{}", resolution.summary());
//! # Ok::<(), agentscope::error::ResolveError>(())
//! ```

pub mod agent;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod logging;
pub mod schema;
pub mod scope;
pub mod tooling;

pub use agent::{AgentCatalog, AgentConfig};
pub use error::{ApiError, ResolveError};
pub use schema::{validate, Violation};
pub use scope::{load_file, resolve, validate_file, Resolution, Scope, ScopePaths, ScopedAgent};
