//! Color palette and styling for CLI output.
//!
//! Every formatter takes a `use_color` flag so output stays plain when color
//! is disabled or stdout is not a terminal.

use owo_colors::{OwoColorize, Style};

/// Style for section headings like "Sources:" or "Targets:".
pub fn heading() -> Style {
    Style::new().bold()
}

/// Style for source names.
pub fn source_name() -> Style {
    Style::new().white().bold()
}

/// Style for skill names.
pub fn skill_name() -> Style {
    Style::new().cyan()
}

/// Style for subdued text: paths, descriptions, skipped items.
pub fn muted() -> Style {
    Style::new().dimmed()
}

/// Style for successful outcomes.
pub fn success() -> Style {
    Style::new().green()
}

/// Style for failures.
pub fn failure() -> Style {
    Style::new().red()
}

/// Style for warnings such as deprecation notices.
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Apply a style when color is enabled.
fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a section heading.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    paint(text, heading(), use_color)
}

/// Format a source name.
pub fn fmt_source_name(text: &str, use_color: bool) -> String {
    paint(text, source_name(), use_color)
}

/// Format a skill name.
pub fn fmt_skill_name(text: &str, use_color: bool) -> String {
    paint(text, skill_name(), use_color)
}

/// Format subdued text.
pub fn fmt_muted(text: &str, use_color: bool) -> String {
    paint(text, muted(), use_color)
}

/// Format a success label.
pub fn fmt_success(text: &str, use_color: bool) -> String {
    paint(text, success(), use_color)
}

/// Format a failure label.
pub fn fmt_failure(text: &str, use_color: bool) -> String {
    paint(text, failure(), use_color)
}

/// Format warning text.
pub fn fmt_warning(text: &str, use_color: bool) -> String {
    paint(text, warning(), use_color)
}

/// Left-align text in a column before styling, so escapes don't skew widths.
pub fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}
