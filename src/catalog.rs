//! Store layout and skill discovery.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    paths::display_path,
};

/// The local cache holding one slot per source.
#[derive(Debug, Clone)]
pub struct Store {
    /// Root directory of the store.
    root: PathBuf,
}

/// A skill directory collected for distribution to targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedSkill {
    /// Source the skill came from.
    pub(crate) source: String,
    /// Directory base name.
    pub(crate) name: String,
    /// Skill directory inside the store.
    pub(crate) dir: PathBuf,
}

impl Store {
    /// Create a store rooted at a directory.
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the store configured for a config.
    pub(crate) fn for_config(config: &Config) -> Self {
        Self::new(config.store_dir().to_path_buf())
    }

    /// Return the store root.
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Return the slot directory for a source name, nested by `/` segments.
    pub(crate) fn slot(&self, source: &str) -> PathBuf {
        source
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Collect skills from every enabled source, in configuration order.
    ///
    /// Slots that are missing or unreadable contribute no skills.
    pub(crate) fn collect(&self, config: &Config, diagnostics: &Diagnostics) -> Vec<CollectedSkill> {
        let mut skills = Vec::new();
        for (name, source) in config.sources() {
            if !source.enabled {
                diagnostics.note(format!("skipping disabled source {name}"));
                continue;
            }
            let slot = self.slot(name);
            if !slot.is_dir() {
                continue;
            }
            let dirs = match skill_dirs(&slot) {
                Ok(dirs) => dirs,
                Err(error) => {
                    diagnostics.note(format!("{}: {error}", display_path(&slot)));
                    continue;
                }
            };
            for dir in dirs {
                skills.push(CollectedSkill {
                    source: name.clone(),
                    name: dir_name(&dir),
                    dir,
                });
            }
        }
        skills
    }
}

/// List the visible subdirectories of a directory, sorted by name.
pub fn skill_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(path).map_err(|error| Error::StoreRead {
        path: path.to_path_buf(),
        source: error,
    })?;

    let mut dirs = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    dirs.sort();
    Ok(dirs)
}

/// Return the base name of a directory as a string.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
