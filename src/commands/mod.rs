//! CLI command implementations.

use std::io::{self, IsTerminal};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Marker for a completed or enabled item.
const MARK_OK: &str = "✓";
/// Marker for a failed item.
const MARK_FAILED: &str = "✗";
/// Marker for a skipped or disabled item.
const MARK_SKIPPED: &str = "○";

/// Column width for source names.
const SOURCE_WIDTH: usize = 30;
/// Column width for target names.
const TARGET_WIDTH: usize = 15;

// Command modules are ordered alphabetically - maintain this order.
/// Config command implementation.
pub mod config;
/// Fetch command implementation.
pub mod fetch;
/// Init command implementation.
pub mod init;
/// List command implementation.
pub mod list;
/// Push command implementation.
pub mod push;
/// Source management command implementation.
pub mod source;
/// Status command implementation.
pub mod status;
/// Target management command implementation.
pub mod target;
