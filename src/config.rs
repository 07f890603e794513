//! Configuration loading, persistence, and mutation.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use url::Url;

use crate::{
    error::{Error, Result},
    paths::{Layout, display_path, expand_path},
};

/// Name prefix marking a source as locally maintained.
pub const LOCAL_PREFIX: &str = "local/";

/// Built-in targets: name, conventional skills directory, enabled by default.
const KNOWN_TARGETS: [(&str, &str, bool); 7] = [
    ("antigravity", "~/.gemini/antigravity/skills", true),
    ("codex", "~/.codex/skills", true),
    ("claude", "~/.claude/skills", true),
    ("cursor", "~/.cursor/skills", true),
    ("gemini", "~/.gemini/skills", false),
    ("vscode", "~/.copilot/skills", false),
    ("windsurf", "~/.windsurf/skills", false),
];

/// A configured origin of skill content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Git repository URL; absent for sources that are never fetched.
    pub(crate) url: Option<String>,
    /// Subdirectory of the repository holding the skills.
    pub(crate) subdir: Option<String>,
    /// Whether the source takes part in fetch and push.
    pub(crate) enabled: bool,
}

/// A configured tool directory receiving skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Expanded skills directory for the tool.
    pub(crate) path: PathBuf,
    /// Whether push writes to this target.
    pub(crate) enabled: bool,
}

/// Parsed configuration for the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store override exactly as written in the config file.
    store: Option<String>,
    /// Resolved store directory.
    store_dir: PathBuf,
    /// Sources in declaration order.
    sources: Vec<(String, Source)>,
    /// Targets in declaration order.
    targets: Vec<(String, Target)>,
}

/// Raw config file structure.
#[derive(Debug, Deserialize)]
struct RawConfig {
    /// Optional store directory override.
    store: Option<String>,
    /// Source table keyed by source name.
    sources: Option<Table>,
    /// Target table keyed by target name.
    targets: Option<Table>,
}

/// Raw source entry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSource {
    /// Repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    /// Repository subdirectory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subdir: Option<String>,
    /// Enabled flag.
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

/// Raw target entry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    /// Target directory, possibly with `~` or variables.
    path: String,
    /// Enabled flag.
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

/// Serde default for enabled flags.
fn enabled_by_default() -> bool {
    true
}

impl Source {
    /// Build an enabled source.
    pub(crate) fn new(url: Option<String>, subdir: Option<String>) -> Self {
        Self {
            url,
            subdir,
            enabled: true,
        }
    }
}

impl Config {
    /// Load the config for a layout, falling back to defaults when the file is absent.
    pub(crate) fn load(layout: &Layout) -> Result<Self> {
        let path = layout.config_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Self::defaults(layout),
            Err(error) => {
                return Err(Error::ConfigRead { path, source: error });
            }
        };
        Self::parse(layout, &path, &contents)
    }

    /// Parse config file contents.
    fn parse(layout: &Layout, path: &Path, contents: &str) -> Result<Self> {
        let parse_error = |source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        };
        let raw: RawConfig = toml::from_str(contents).map_err(parse_error)?;
        let base_dir = path.parent().unwrap_or(Path::new("."));

        let store_dir = match &raw.store {
            Some(store) => expand_path(store, base_dir)?,
            None => layout.default_store_dir(),
        };

        let mut sources = Vec::new();
        for (name, value) in raw.sources.unwrap_or_default() {
            if validate_source_name(&name).is_err() {
                return Err(Error::ConfigSourceName {
                    path: path.to_path_buf(),
                    name,
                });
            }
            let entry: RawSource = value.try_into().map_err(parse_error)?;
            sources.push((
                name,
                Source {
                    url: entry.url,
                    subdir: entry.subdir,
                    enabled: entry.enabled,
                },
            ));
        }

        let mut targets = Vec::new();
        for (name, value) in raw.targets.unwrap_or_default() {
            let entry: RawTarget = value.try_into().map_err(parse_error)?;
            targets.push((
                name,
                Target {
                    path: expand_path(&entry.path, base_dir)?,
                    enabled: entry.enabled,
                },
            ));
        }

        Ok(Self {
            store: raw.store,
            store_dir,
            sources,
            targets,
        })
    }

    /// Build the compiled-in default configuration.
    pub(crate) fn defaults(layout: &Layout) -> Result<Self> {
        let sources = vec![
            (
                "anthropics/skills".to_string(),
                Source::new(Some("https://github.com/anthropics/skills".to_string()), None),
            ),
            (
                "vercel-labs/agent-skills".to_string(),
                Source::new(
                    Some("https://github.com/vercel-labs/agent-skills".to_string()),
                    Some("skills".to_string()),
                ),
            ),
        ];

        let mut targets = Vec::new();
        for (name, path, enabled) in KNOWN_TARGETS {
            targets.push((
                name.to_string(),
                Target {
                    path: expand_path(path, layout.home())?,
                    enabled,
                },
            ));
        }

        Ok(Self {
            store: None,
            store_dir: layout.default_store_dir(),
            sources,
            targets,
        })
    }

    /// Build a config with no sources or targets.
    #[cfg(test)]
    pub(crate) fn empty(store_dir: PathBuf) -> Self {
        Self {
            store: None,
            store_dir,
            sources: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Persist the config, replacing the file in a single rename.
    pub(crate) fn save(&self, layout: &Layout) -> Result<()> {
        let path = layout.config_path();
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| Error::ConfigWrite {
                path: parent.to_path_buf(),
                source: error,
            })?;
        }

        let staging = path.with_extension("toml.tmp");
        fs::write(&staging, contents).map_err(|error| Error::ConfigWrite {
            path: staging.clone(),
            source: error,
        })?;
        fs::rename(&staging, &path).map_err(|error| Error::ConfigWrite { path, source: error })
    }

    /// Serialize the config to TOML.
    fn to_toml(&self) -> Result<String> {
        let serialize_error = |source| Error::ConfigSerialize { source };

        let mut sources = Table::new();
        for (name, source) in &self.sources {
            let raw = RawSource {
                url: source.url.clone(),
                subdir: source.subdir.clone(),
                enabled: source.enabled,
            };
            sources.insert(name.clone(), Value::try_from(raw).map_err(serialize_error)?);
        }

        let mut targets = Table::new();
        for (name, target) in &self.targets {
            let raw = RawTarget {
                path: display_path(&target.path),
                enabled: target.enabled,
            };
            targets.insert(name.clone(), Value::try_from(raw).map_err(serialize_error)?);
        }

        let mut document = Table::new();
        if let Some(store) = &self.store {
            document.insert("store".to_string(), Value::String(store.clone()));
        }
        document.insert("sources".to_string(), Value::Table(sources));
        document.insert("targets".to_string(), Value::Table(targets));
        toml::to_string(&document).map_err(serialize_error)
    }

    /// Return the store directory.
    pub(crate) fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Return the configured sources in declaration order.
    pub(crate) fn sources(&self) -> &[(String, Source)] {
        &self.sources
    }

    /// Return the configured targets in declaration order.
    pub(crate) fn targets(&self) -> &[(String, Target)] {
        &self.targets
    }

    /// Look up a source by name.
    pub(crate) fn source(&self, name: &str) -> Option<&Source> {
        self.sources
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, source)| source)
    }

    /// Look up a target by name.
    pub(crate) fn target(&self, name: &str) -> Option<&Target> {
        self.targets
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, target)| target)
    }

    /// Add a source, defaulting the URL to GitHub for `owner/repo` names.
    pub(crate) fn add_source(
        &mut self,
        name: &str,
        url: Option<&str>,
        subdir: Option<&str>,
    ) -> Result<()> {
        validate_source_name(name)?;
        if self.source(name).is_some() {
            return Err(Error::SourceExists {
                name: name.to_string(),
            });
        }

        let url = if is_local_source(name) {
            None
        } else {
            let url = url
                .map(str::to_string)
                .unwrap_or_else(|| format!("https://github.com/{name}"));
            Url::parse(&url).map_err(|_| Error::InvalidUrl { url: url.clone() })?;
            Some(url)
        };
        let subdir = subdir
            .map(|subdir| subdir.trim_matches('/').to_string())
            .filter(|subdir| !subdir.is_empty());

        self.sources
            .push((name.to_string(), Source::new(url, subdir)));
        Ok(())
    }

    /// Remove a source.
    pub(crate) fn remove_source(&mut self, name: &str) -> Result<()> {
        let index = self
            .sources
            .iter()
            .position(|(candidate, _)| candidate == name)
            .ok_or_else(|| Error::SourceNotFound {
                name: name.to_string(),
            })?;
        self.sources.remove(index);
        Ok(())
    }

    /// Enable or disable a source.
    pub(crate) fn set_source_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let (_, source) = self
            .sources
            .iter_mut()
            .find(|(candidate, _)| candidate == name)
            .ok_or_else(|| Error::SourceNotFound {
                name: name.to_string(),
            })?;
        source.enabled = enabled;
        Ok(())
    }

    /// Add a target; known tool names default to their conventional directory.
    pub(crate) fn add_target(
        &mut self,
        name: &str,
        path: Option<&str>,
        base_dir: &Path,
    ) -> Result<()> {
        if self.target(name).is_some() {
            return Err(Error::TargetExists {
                name: name.to_string(),
            });
        }

        let raw = match path {
            Some(path) => path,
            None => known_target_path(name).ok_or_else(|| Error::UnknownTarget {
                name: name.to_string(),
            })?,
        };
        let target = Target {
            path: expand_path(raw, base_dir)?,
            enabled: true,
        };
        self.targets.push((name.to_string(), target));
        Ok(())
    }

    /// Remove a target.
    pub(crate) fn remove_target(&mut self, name: &str) -> Result<()> {
        let index = self
            .targets
            .iter()
            .position(|(candidate, _)| candidate == name)
            .ok_or_else(|| Error::TargetNotFound {
                name: name.to_string(),
            })?;
        self.targets.remove(index);
        Ok(())
    }

    /// Enable or disable a target.
    pub(crate) fn set_target_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let (_, target) = self
            .targets
            .iter_mut()
            .find(|(candidate, _)| candidate == name)
            .ok_or_else(|| Error::TargetNotFound {
                name: name.to_string(),
            })?;
        target.enabled = enabled;
        Ok(())
    }
}

/// Return whether a source name denotes a locally maintained source.
pub fn is_local_source(name: &str) -> bool {
    name.starts_with(LOCAL_PREFIX)
}

/// Return the conventional skills directory for a known tool.
pub fn known_target_path(name: &str) -> Option<&'static str> {
    KNOWN_TARGETS
        .iter()
        .find(|(known, _, _)| *known == name)
        .map(|(_, path, _)| *path)
}

/// Check that a source name has exactly two plain path segments.
fn validate_source_name(name: &str) -> Result<()> {
    let segments = name.split('/').collect::<Vec<_>>();
    let valid = segments.len() == 2
        && segments.iter().all(|segment| {
            !segment.is_empty() && *segment != "." && *segment != ".." && !segment.contains('\\')
        });
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidSourceName {
            name: name.to_string(),
        })
    }
}
