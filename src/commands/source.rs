//! Implementation of the `skillsync source` subcommands.

use crate::{
    catalog::Store,
    commands::{ColorChoice, MARK_OK, MARK_SKIPPED, SOURCE_WIDTH},
    config::{Config, is_local_source},
    error::Result,
    palette::{fmt_heading, fmt_muted, fmt_source_name, fmt_success, pad},
    paths::{Layout, display_path},
};

/// Add a source and persist the config.
pub async fn add(
    layout: &Layout,
    config: &mut Config,
    name: &str,
    url: Option<&str>,
    subdir: Option<&str>,
) -> Result<()> {
    config.add_source(name, url, subdir)?;
    config.save(layout)?;

    println!("Added source {name}");
    if is_local_source(name) {
        let slot = Store::for_config(config).slot(name);
        println!("Place skill directories in {}", display_path(&slot));
    } else {
        println!("Run `skillsync fetch {name}` to download it.");
    }
    Ok(())
}

/// Remove a source and persist the config.
///
/// The store slot is left in place; it no longer takes part in push.
pub async fn remove(layout: &Layout, config: &mut Config, name: &str) -> Result<()> {
    config.remove_source(name)?;
    config.save(layout)?;
    println!("Removed source {name}");
    Ok(())
}

/// Enable or disable a source and persist the config.
pub async fn set_enabled(
    layout: &Layout,
    config: &mut Config,
    name: &str,
    enabled: bool,
) -> Result<()> {
    config.set_source_enabled(name, enabled)?;
    config.save(layout)?;
    let state = if enabled { "Enabled" } else { "Disabled" };
    println!("{state} source {name}");
    Ok(())
}

/// Print one line per configured source.
pub async fn list(color: ColorChoice, config: &Config) -> Result<()> {
    let use_color = color.enabled();
    println!();
    println!("{}", fmt_heading("Sources:", use_color));
    if config.sources().is_empty() {
        println!("  {}", fmt_muted("(none)", use_color));
    }
    for (name, source) in config.sources() {
        let mark = if source.enabled {
            fmt_success(MARK_OK, use_color)
        } else {
            fmt_muted(MARK_SKIPPED, use_color)
        };
        let location = source.url.as_deref().unwrap_or("(local)");
        let mut line = format!(
            "  {mark} {} {}",
            fmt_source_name(&pad(name, SOURCE_WIDTH), use_color),
            fmt_muted(location, use_color)
        );
        if let Some(subdir) = &source.subdir {
            line.push_str(&fmt_muted(&format!(" ({subdir})"), use_color));
        }
        println!("{line}");
    }
    println!();
    Ok(())
}
