//! Implementation of the `skillsync target` subcommands.

use std::{env, path::PathBuf};

use crate::{
    commands::{ColorChoice, MARK_OK, MARK_SKIPPED, TARGET_WIDTH, config::target_summary},
    config::Config,
    error::Result,
    palette::{fmt_heading, fmt_muted, fmt_success, pad},
    paths::{Layout, display_path},
};

/// Add a target and persist the config.
///
/// Relative paths resolve against the current directory.
pub async fn add(
    layout: &Layout,
    config: &mut Config,
    name: &str,
    path: Option<&str>,
) -> Result<()> {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    config.add_target(name, path, &cwd)?;
    config.save(layout)?;

    if let Some(target) = config.target(name) {
        println!("Added target {name} ({})", display_path(&target.path));
    }
    Ok(())
}

/// Remove a target and persist the config.
///
/// Skills already copied into the target directory are left in place.
pub async fn remove(layout: &Layout, config: &mut Config, name: &str) -> Result<()> {
    config.remove_target(name)?;
    config.save(layout)?;
    println!("Removed target {name}");
    Ok(())
}

/// Enable or disable a target and persist the config.
pub async fn set_enabled(
    layout: &Layout,
    config: &mut Config,
    name: &str,
    enabled: bool,
) -> Result<()> {
    config.set_target_enabled(name, enabled)?;
    config.save(layout)?;
    let state = if enabled { "Enabled" } else { "Disabled" };
    println!("{state} target {name}");
    Ok(())
}

/// Print one line per configured target.
pub async fn list(color: ColorChoice, config: &Config) -> Result<()> {
    let use_color = color.enabled();

    println!();
    println!("{}", fmt_heading("Targets:", use_color));
    println!("  {}", fmt_muted(&target_summary(config.targets()), use_color));
    for (name, target) in config.targets() {
        let mark = if target.enabled {
            fmt_success(MARK_OK, use_color)
        } else {
            fmt_muted(MARK_SKIPPED, use_color)
        };
        println!(
            "  {mark} {} {}",
            pad(name, TARGET_WIDTH),
            fmt_muted(&display_path(&target.path), use_color)
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{add, remove, set_enabled};
    use crate::{config::Config, error::Error, testutil::TestFixture};

    #[tokio::test]
    async fn add_persists_explicit_paths() {
        let mut fixture = TestFixture::new();
        let layout = fixture.layout().clone();
        let dest = fixture.target_dir("emacs");

        let raw = dest.to_string_lossy().to_string();
        add(&layout, fixture.config_mut(), "emacs", Some(&raw))
            .await
            .expect("add");

        let reloaded = Config::load(&layout).expect("load");
        let target = reloaded.target("emacs").expect("target");
        assert_eq!(target.path, dest);
        assert!(target.enabled);
    }

    #[tokio::test]
    async fn unknown_names_need_a_path() {
        let mut fixture = TestFixture::new();
        let layout = fixture.layout().clone();

        let error = add(&layout, fixture.config_mut(), "emacs", None)
            .await
            .expect_err("add should fail");

        assert!(matches!(error, Error::UnknownTarget { .. }));
        assert!(!layout.config_path().exists());
    }

    #[tokio::test]
    async fn toggles_and_removes_targets() {
        let mut fixture = TestFixture::new().with_target("claude");
        let layout = fixture.layout().clone();

        set_enabled(&layout, fixture.config_mut(), "claude", false)
            .await
            .expect("disable");
        let reloaded = Config::load(&layout).expect("load");
        assert!(!reloaded.target("claude").expect("target").enabled);

        remove(&layout, fixture.config_mut(), "claude")
            .await
            .expect("remove");
        let reloaded = Config::load(&layout).expect("load");
        assert!(reloaded.target("claude").is_none());
        assert!(reloaded.targets().is_empty());
    }
}
