//! Directory scanning, per-file loading and the scope merge.

use super::paths::{LoaderSettings, ScopePaths};
use super::report::{FileFailure, FileFailureReason, Resolution, ScopedAgent};
use super::Scope;
use crate::agent::AgentConfig;
use crate::document::AgentDocument;
use crate::error::ResolveError;
use crate::format;
use crate::schema;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Resolve both scopes into one name-keyed mapping.
///
/// Files that fail to load are recorded in [`Resolution::failures`] and
/// skipped. Only an unusable scope directory aborts resolution.
pub fn resolve(paths: &ScopePaths, settings: &LoaderSettings) -> Result<Resolution, ResolveError> {
    let mut resolution = Resolution::default();

    for scope in Scope::ALL {
        let Some(dir) = paths.get(scope) else {
            debug!(%scope, "No {} agent directory", scope);
            continue;
        };

        let agents = load_scope(scope, dir, settings, &mut resolution)?;
        info!(
            %scope,
            count = agents.len(),
            "Loaded agents from {}",
            dir.display()
        );

        for agent in agents {
            let name = agent.config.name.clone();
            if let Some(replaced) = resolution.agents.insert(name.clone(), agent) {
                info!(
                    "Project agent '{}' overrides global agent from {}",
                    name,
                    replaced.source.display()
                );
                resolution.overridden.push(name);
            }
        }
    }

    Ok(resolution)
}

/// Load every recognized file under one scope directory.
///
/// Within a scope the first file (in file-name order) to define a name
/// keeps it.
fn load_scope(
    scope: Scope,
    dir: &Path,
    settings: &LoaderSettings,
    resolution: &mut Resolution,
) -> Result<Vec<ScopedAgent>, ResolveError> {
    let mut agents = Vec::new();
    let mut defined: HashMap<String, PathBuf> = HashMap::new();

    for path in agent_files(scope, dir, settings, &mut resolution.failures)? {
        resolution.sources.insert(path.clone(), modified_time(&path));

        let reason = match load_file_with(&path, settings) {
            Ok(config) => match defined.get(&config.name) {
                Some(first) => FileFailureReason::DuplicateName {
                    name: config.name,
                    first: first.clone(),
                },
                None => {
                    debug!(%scope, "Loaded agent '{}' from {}", config.name, path.display());
                    defined.insert(config.name.clone(), path.clone());
                    agents.push(ScopedAgent {
                        config,
                        origin: scope,
                        source: path,
                    });
                    continue;
                }
            },
            Err(reason) => reason,
        };

        warn!(%scope, "Excluding agent file {}: {}", path.display(), reason);
        resolution.failures.push(FileFailure {
            path,
            scope,
            reason,
        });
    }

    Ok(agents)
}

/// Recognized agent files under a scope directory, in file-name order.
///
/// An unusable directory is fatal. Entries below it that cannot be read are
/// recorded in `failures` and skipped.
fn agent_files(
    scope: Scope,
    dir: &Path,
    settings: &LoaderSettings,
    failures: &mut Vec<FileFailure>,
) -> Result<Vec<PathBuf>, ResolveError> {
    let unavailable = |source: io::Error| ResolveError::DirectoryUnavailable {
        scope,
        path: dir.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(dir).map_err(unavailable)?;
    if !metadata.is_dir() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }
    std::fs::read_dir(dir).map_err(unavailable)?;

    let walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory loop"));
                return Err(unavailable(source));
            }
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                warn!("Failed to read directory entry in {}: {}", dir.display(), e);
                failures.push(FileFailure {
                    path,
                    scope,
                    reason: FileFailureReason::Unreadable {
                        message: e.to_string(),
                    },
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if format::adapter_for(entry.path()).is_none() {
            debug!("Skipping {}: not an agent file", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Modification times of every agent file currently in the scope
/// directories.
///
/// Comparing this with [`Resolution::sources`] tells whether a file was
/// added, removed or edited since that resolution.
pub fn source_times(
    paths: &ScopePaths,
    settings: &LoaderSettings,
) -> Result<BTreeMap<PathBuf, Option<SystemTime>>, ResolveError> {
    let mut times = BTreeMap::new();
    let mut ignored = Vec::new();
    for scope in Scope::ALL {
        if let Some(dir) = paths.get(scope) {
            for path in agent_files(scope, dir, settings, &mut ignored)? {
                let modified = modified_time(&path);
                times.insert(path, modified);
            }
        }
    }
    Ok(times)
}

/// Load and validate a single agent file with default limits.
pub fn load_file(path: &Path) -> Result<AgentConfig, FileFailureReason> {
    load_file_with(path, &LoaderSettings::default())
}

/// Load and validate a single agent file.
pub fn load_file_with(path: &Path, settings: &LoaderSettings) -> Result<AgentConfig, FileFailureReason> {
    let adapter = format::adapter_for(path).ok_or(FileFailureReason::UnsupportedFormat)?;
    let bytes = read_bounded(path, settings.max_file_bytes)?;
    let node = adapter
        .parse(&bytes)
        .map_err(|error| FileFailureReason::Parse { error })?;
    let doc = AgentDocument::from_node(node).map_err(|error| FileFailureReason::Parse { error })?;
    schema::validate(&doc).map_err(|violations| FileFailureReason::Invalid { violations })
}

/// Check a single file without keeping the result.
pub fn validate_file(path: &Path) -> Result<(), FileFailureReason> {
    load_file(path).map(|_| ())
}

fn read_bounded(path: &Path, limit: u64) -> Result<Vec<u8>, FileFailureReason> {
    let unreadable = |e: io::Error| FileFailureReason::Unreadable {
        message: e.to_string(),
    };

    let file = File::open(path).map_err(unreadable)?;
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(unreadable)?;

    if bytes.len() as u64 > limit {
        let size = std::fs::metadata(path)
            .map(|m| m.len())
            .unwrap_or(bytes.len() as u64);
        return Err(FileFailureReason::TooLarge { size, limit });
    }
    Ok(bytes)
}
