//! Read-only reports over sources, the store, and targets.

use std::path::{Path, PathBuf};

use crate::{
    catalog::{Store, skill_dirs},
    config::{Config, is_local_source},
    diagnostics::Diagnostics,
    paths::display_path,
    skill::{Skill, load_skill},
};

/// Store state of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// The slot exists and holds this many skill directories.
    Fetched(usize),
    /// Local source without a slot.
    Local,
    /// Remote source that has never been fetched.
    NotFetched,
}

/// Status line for one source.
#[derive(Debug, Clone)]
pub struct SourceStatus {
    /// Source name.
    pub(crate) name: String,
    /// Whether the source is enabled.
    pub(crate) enabled: bool,
    /// Store state.
    pub(crate) state: SourceState,
}

/// On-disk state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// The target is disabled.
    Disabled,
    /// The directory holds this many skill directories.
    Skills(usize),
    /// The directory exists but holds no skills.
    Empty,
    /// The directory does not exist.
    NotCreated,
}

/// Status line for one target.
#[derive(Debug, Clone)]
pub struct TargetStatus {
    /// Target name.
    pub(crate) name: String,
    /// Resolved target directory.
    pub(crate) path: PathBuf,
    /// On-disk state.
    pub(crate) state: TargetState,
}

/// Status of every configured source and target.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Sources in configuration order.
    pub(crate) sources: Vec<SourceStatus>,
    /// Targets in configuration order.
    pub(crate) targets: Vec<TargetStatus>,
}

/// Skills of one source for the list report.
#[derive(Debug, Clone)]
pub struct SourceListing {
    /// Source name.
    pub(crate) name: String,
    /// Whether the source is enabled.
    pub(crate) enabled: bool,
    /// Whether the source has a store slot.
    pub(crate) fetched: bool,
    /// Skills in the slot, sorted by directory name.
    pub(crate) skills: Vec<Skill>,
}

/// Skills grouped by source.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Number of skills across enabled sources.
    pub(crate) total: usize,
    /// Matching sources in configuration order.
    pub(crate) sources: Vec<SourceListing>,
}

/// Build the status report for a config.
pub fn build_report(config: &Config, store: &Store, diagnostics: &Diagnostics) -> StatusReport {
    let sources = config
        .sources()
        .iter()
        .map(|(name, source)| SourceStatus {
            name: name.clone(),
            enabled: source.enabled,
            state: source_state(store, name, diagnostics),
        })
        .collect();

    let targets = config
        .targets()
        .iter()
        .map(|(name, target)| {
            let state = if !target.enabled {
                TargetState::Disabled
            } else if !target.path.is_dir() {
                TargetState::NotCreated
            } else {
                match count_skills(&target.path, diagnostics) {
                    0 => TargetState::Empty,
                    count => TargetState::Skills(count),
                }
            };
            TargetStatus {
                name: name.clone(),
                path: target.path.clone(),
                state,
            }
        })
        .collect();

    StatusReport { sources, targets }
}

/// Build the skill listing, optionally filtered by source name.
///
/// The filter is a case-insensitive substring match.
pub fn build_listing(
    config: &Config,
    store: &Store,
    filter: Option<&str>,
    diagnostics: &Diagnostics,
) -> Listing {
    let filter = filter.map(str::to_lowercase);
    let mut total = 0;
    let mut sources = Vec::new();

    for (name, source) in config.sources() {
        let matches = filter
            .as_ref()
            .is_none_or(|filter| name.to_lowercase().contains(filter.as_str()));
        if !matches {
            continue;
        }
        let slot = store.slot(name);
        let fetched = slot.is_dir();
        let skills = if fetched {
            match skill_dirs(&slot) {
                Ok(dirs) => dirs.iter().map(|dir| load_skill(dir)).collect(),
                Err(error) => {
                    diagnostics.note(format!("{}: {error}", display_path(&slot)));
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        if source.enabled {
            total += skills.len();
        }
        sources.push(SourceListing {
            name: name.clone(),
            enabled: source.enabled,
            fetched,
            skills,
        });
    }

    Listing { total, sources }
}

/// Determine the store state of a source.
fn source_state(store: &Store, name: &str, diagnostics: &Diagnostics) -> SourceState {
    let slot = store.slot(name);
    if slot.is_dir() {
        SourceState::Fetched(count_skills(&slot, diagnostics))
    } else if is_local_source(name) {
        SourceState::Local
    } else {
        SourceState::NotFetched
    }
}

/// Count skill directories, treating unreadable directories as empty.
fn count_skills(path: &Path, diagnostics: &Diagnostics) -> usize {
    match skill_dirs(path) {
        Ok(dirs) => dirs.len(),
        Err(error) => {
            diagnostics.note(format!("{}: {error}", display_path(path)));
            0
        }
    }
}
