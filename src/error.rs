//! Error types for the skillsync CLI.

use std::{
    env::VarError, io, path::PathBuf, process::ExitCode, result::Result as StdResult,
};

use thiserror::Error;
use toml::{de::Error as TomlError, ser::Error as TomlSerError};

/// Result type for skillsync operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// A source name in the configuration file is not usable as a store slot.
    #[error(
        "Invalid source name \"{name}\" in config at {path}: expected owner/repo or local/name"
    )]
    ConfigSourceName {
        /// Path to the config file.
        path: PathBuf,
        /// Rejected source name.
        name: String,
    },
    /// The configuration file could not be serialized.
    #[error("Failed to serialize config: {source}")]
    ConfigSerialize {
        /// Underlying serialization error.
        source: TomlSerError,
    },
    /// The configuration file could not be written.
    #[error("Failed to write config at {path}: {source}")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// A configured path was not valid Unicode for expansion.
    #[error("Invalid path in config: {path}")]
    PathNotUnicode {
        /// Path that could not be represented as UTF-8.
        path: PathBuf,
    },
    /// A named source is not configured.
    #[error("Source \"{name}\" not found")]
    SourceNotFound {
        /// Missing source name.
        name: String,
    },
    /// A source with the same name is already configured.
    #[error("Source \"{name}\" already exists")]
    SourceExists {
        /// Duplicate source name.
        name: String,
    },
    /// A source name is not of the form `owner/repo` or `local/name`.
    #[error("Invalid source name \"{name}\": expected owner/repo or local/name")]
    InvalidSourceName {
        /// Rejected source name.
        name: String,
    },
    /// Invalid URL.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL.
        url: String,
    },
    /// A named target is not configured.
    #[error("Target \"{name}\" not found")]
    TargetNotFound {
        /// Missing target name.
        name: String,
    },
    /// A target with the same name is already configured.
    #[error("Target \"{name}\" already exists")]
    TargetExists {
        /// Duplicate target name.
        name: String,
    },
    /// A target was added without a path and is not a known tool.
    #[error("Unknown target \"{name}\"; pass a path: target add {name} <path>")]
    UnknownTarget {
        /// Target name without a default path.
        name: String,
    },
    /// A configured subdirectory is missing from a cloned repository.
    #[error("Subdir \"{subdir}\" not found")]
    SubdirNotFound {
        /// Subdirectory that was expected inside the clone.
        subdir: String,
    },
    /// The git executable could not be started.
    #[error("Failed to run git: {source}")]
    GitSpawn {
        /// Underlying spawn error.
        source: io::Error,
    },
    /// A git clone exited unsuccessfully.
    #[error("git clone {url} failed: {message}")]
    GitClone {
        /// Repository URL.
        url: String,
        /// Output captured from git.
        message: String,
    },
    /// A store or target directory could not be read.
    #[error("Failed to read {path}: {source}")]
    StoreRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A store or target directory could not be written.
    #[error("Failed to write {path}: {source}")]
    StoreWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Command line arguments were rejected.
    #[error("{message}")]
    Usage {
        /// Rendered usage message.
        message: String,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }

    /// Render the error for printing on stderr.
    pub fn report(&self) -> String {
        match self {
            Self::Usage { message } => message.trim_end().to_string(),
            other => format!("Error: {other}"),
        }
    }

    /// Return the first line of the message, for single-line status output.
    pub(crate) fn first_line(&self) -> String {
        let message = self.to_string();
        message.lines().next().unwrap_or_default().to_string()
    }
}
