//! Path expansion, normalization, and the on-disk layout.

use std::{
    env::{self, VarError},
    path::{MAIN_SEPARATOR, Path, PathBuf},
};

use path_clean::PathClean;

use crate::error::{Error, Result};

/// Environment variable that overrides the skillsync home directory.
pub const HOME_ENV: &str = "SKILLSYNC_HOME";

/// File name of the persisted configuration inside the home directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name of the default store inside the home directory.
const STORE_DIR_NAME: &str = "store";

/// Resolved locations of the config file and default store.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Directory holding the config file and the default store.
    home: PathBuf,
}

impl Layout {
    /// Resolve the layout from `SKILLSYNC_HOME`, falling back to `~/.skillsync`.
    pub(crate) fn resolve() -> Result<Self> {
        match env::var(HOME_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                Ok(Self::new(expand_path(raw.trim(), &cwd)?))
            }
            Ok(_) | Err(VarError::NotPresent) => {
                let home = dirs::home_dir().ok_or(Error::HomeDirMissing)?;
                Ok(Self::new(home.join(".skillsync")))
            }
            Err(VarError::NotUnicode(raw)) => Err(Error::PathNotUnicode {
                path: PathBuf::from(raw),
            }),
        }
    }

    /// Build a layout rooted at an explicit directory.
    pub(crate) fn new(home: PathBuf) -> Self {
        Self { home }
    }

    /// Return the home directory.
    pub(crate) fn home(&self) -> &Path {
        &self.home
    }

    /// Return the config file path.
    pub(crate) fn config_path(&self) -> PathBuf {
        self.home.join(CONFIG_FILE_NAME)
    }

    /// Return the store directory used when the config does not name one.
    pub(crate) fn default_store_dir(&self) -> PathBuf {
        self.home.join(STORE_DIR_NAME)
    }
}

/// Expand a config-provided path and resolve it relative to a base directory.
pub fn expand_path(raw: &str, base_dir: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|error| Error::PathExpansion {
        path: raw.to_string(),
        source: error,
    })?;
    let expanded_path = PathBuf::from(expanded.as_ref());
    let resolved = if expanded_path.is_relative() {
        base_dir.join(expanded_path)
    } else {
        expanded_path
    };
    Ok(normalize_path(&resolved))
}

/// Normalize a path by canonicalizing when it exists and cleaning otherwise.
pub fn normalize_path(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => path.clean(),
    }
}

/// Render a path for display, using a tilde prefix for the home directory.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}
