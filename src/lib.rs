#![warn(missing_docs)]
//! Library support for the skillsync CLI.

/// Store layout and skill discovery.
mod catalog;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading, persistence, and mutation.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Error handling for the crate.
mod error;
/// Directory copy and removal helpers.
mod files;
/// Frontmatter metadata parsing for skills.
mod frontmatter;
/// Shallow repository cloning.
mod git;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and the on-disk layout.
mod paths;
/// Skill directory loading.
mod skill;
/// Status and listing reports.
mod status;
/// Shared fixtures for unit tests.
#[cfg(test)]
mod testutil;

pub use crate::error::{Error, Result};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}
