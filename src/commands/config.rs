//! Implementation of the `skillsync config` command.

use crate::{
    catalog::Store,
    commands::{ColorChoice, MARK_OK, MARK_SKIPPED, TARGET_WIDTH},
    config::{Config, Source, Target},
    error::Result,
    palette::{fmt_heading, fmt_muted, fmt_source_name, fmt_success, pad},
    paths::{Layout, display_path},
};

/// Execute the config command.
///
/// Only the loaded config is reported; store and target directories are not read.
pub async fn run(color: ColorChoice, layout: &Layout, config: &Config) -> Result<()> {
    let use_color = color.enabled();
    let store = Store::for_config(config);

    println!();
    println!("{}", fmt_heading("Sources:", use_color));
    println!("  {}", fmt_muted(&source_summary(config.sources()), use_color));
    println!();
    for (name, source) in config.sources() {
        let mut line = format!(
            "  {} {}",
            mark(source.enabled, use_color),
            fmt_source_name(name, use_color)
        );
        if !source.enabled {
            line.push_str(&fmt_muted(" (disabled)", use_color));
        }
        println!("{line}");
        for detail in source_details(source) {
            println!("      {}", fmt_muted(&detail, use_color));
        }
    }

    println!();
    println!("{}", fmt_heading("Targets:", use_color));
    println!("  {}", fmt_muted(&target_summary(config.targets()), use_color));
    println!();
    for (name, target) in config.targets() {
        let mut line = format!(
            "  {} {} {}",
            mark(target.enabled, use_color),
            pad(name, TARGET_WIDTH),
            fmt_muted(&display_path(&target.path), use_color)
        );
        if !target.enabled {
            line.push_str(&fmt_muted(" (disabled)", use_color));
        }
        println!("{line}");
    }

    println!();
    println!(
        "{} {}",
        fmt_heading("Config file:", use_color),
        display_path(&layout.config_path())
    );
    println!(
        "{} {}",
        fmt_heading("Store:", use_color),
        display_path(store.root())
    );
    println!();
    Ok(())
}

/// Summarize how many sources are enabled.
fn source_summary(sources: &[(String, Source)]) -> String {
    let active = sources.iter().filter(|(_, source)| source.enabled).count();
    format!("{active} active")
}

/// Summarize enabled and disabled target counts.
pub(crate) fn target_summary(targets: &[(String, Target)]) -> String {
    let enabled = targets.iter().filter(|(_, target)| target.enabled).count();
    let disabled = targets.len() - enabled;
    format!("{enabled} enabled, {disabled} disabled")
}

/// Marker for an enabled or disabled entry.
fn mark(enabled: bool, use_color: bool) -> String {
    if enabled {
        fmt_success(MARK_OK, use_color)
    } else {
        fmt_muted(MARK_SKIPPED, use_color)
    }
}

/// Detail lines shown under a source.
fn source_details(source: &Source) -> Vec<String> {
    let mut lines = Vec::new();
    match &source.url {
        Some(url) => lines.push(format!("URL: {url}")),
        None => lines.push("URL: (local)".to_string()),
    }
    if let Some(subdir) = &source.subdir {
        lines.push(format!("Subdir: {subdir}"));
    }
    lines
}
