//! Agent catalog: the current merged agent set, replaced atomically on reload.

use crate::error::ResolveError;
use crate::scope::{self, LoaderSettings, Resolution, ScopePaths, ScopedAgent};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Holds the last successful [`Resolution`].
///
/// Readers take an `Arc` snapshot and never observe a half-built mapping.
/// A reload that fails leaves the previous snapshot in place.
pub struct AgentCatalog {
    paths: ScopePaths,
    settings: LoaderSettings,
    current: RwLock<Arc<Resolution>>,
}

impl AgentCatalog {
    /// Create an empty catalog; call [`AgentCatalog::reload`] to populate it.
    pub fn new(paths: ScopePaths, settings: LoaderSettings) -> Self {
        Self {
            paths,
            settings,
            current: RwLock::new(Arc::new(Resolution::default())),
        }
    }

    /// Create a catalog and load it once.
    pub fn load(paths: ScopePaths, settings: LoaderSettings) -> Result<Self, ResolveError> {
        let catalog = Self::new(paths, settings);
        catalog.reload()?;
        Ok(catalog)
    }

    pub fn paths(&self) -> &ScopePaths {
        &self.paths
    }

    /// Resolve both scopes again and publish the result.
    pub fn reload(&self) -> Result<Arc<Resolution>, ResolveError> {
        let resolution = Arc::new(scope::resolve(&self.paths, &self.settings)?);
        *self.current.write() = Arc::clone(&resolution);
        tracing::debug!(
            agents = resolution.valid_count(),
            failures = resolution.invalid_count(),
            "Published agent catalog"
        );
        Ok(resolution)
    }

    /// Reload only when an agent file was added, removed or modified since
    /// the published resolution. Returns whether a reload happened.
    pub fn reload_if_changed(&self) -> Result<bool, ResolveError> {
        let current = scope::source_times(&self.paths, &self.settings)?;
        if current == self.current.read().sources {
            return Ok(false);
        }
        tracing::info!("Agent files changed, reloading catalog");
        self.reload()?;
        Ok(true)
    }

    /// The currently published resolution.
    pub fn snapshot(&self) -> Arc<Resolution> {
        Arc::clone(&self.current.read())
    }

    pub fn get(&self, name: &str) -> Option<ScopedAgent> {
        self.current.read().agents.get(name).cloned()
    }

    /// Agent names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.current.read().agents.keys().cloned().collect()
    }

    /// Agents whose `file_patterns` match `path`.
    pub fn agents_for_file(&self, path: &Path) -> Vec<ScopedAgent> {
        self.current
            .read()
            .agents
            .values()
            .filter(|agent| agent.config.matches_file(path))
            .cloned()
            .collect()
    }

    /// Agents carrying at least one of `tags`.
    pub fn agents_with_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<ScopedAgent> {
        self.current
            .read()
            .agents
            .values()
            .filter(|agent| tags.iter().any(|tag| agent.config.has_tag(tag.as_ref())))
            .cloned()
            .collect()
    }
}
