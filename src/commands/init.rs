//! Implementation of the `skillsync init` command.

use crate::{
    commands::ColorChoice,
    config::Config,
    error::Result,
    palette::{fmt_heading, fmt_muted, fmt_success},
    paths::{Layout, display_path},
};

/// Execute the init command.
pub async fn run(color: ColorChoice, layout: &Layout) -> Result<()> {
    let use_color = color.enabled();
    let config_path = layout.config_path();
    if config_path.is_file() {
        println!();
        println!(
            "{}",
            fmt_muted(
                &format!("Config already exists: {}", display_path(&config_path)),
                use_color
            )
        );
        println!();
        return Ok(());
    }

    let config = initialize(layout)?;

    println!();
    println!("{}", fmt_success("✓ Initialized skillsync", use_color));
    println!();
    println!(
        "{}",
        fmt_muted(&format!("Config: {}", display_path(&config_path)), use_color)
    );
    println!(
        "{}",
        fmt_muted(
            &format!("Store:  {}", display_path(config.store_dir())),
            use_color
        )
    );
    println!();

    println!("{}", fmt_heading("Default sources:", use_color));
    for (name, _) in config.sources() {
        println!("  {}", fmt_muted(&format!("• {name}"), use_color));
    }
    println!();

    let enabled = config
        .targets()
        .iter()
        .filter(|(_, target)| target.enabled)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>();
    println!("{}", fmt_heading("Enabled targets:", use_color));
    println!("  {}", fmt_muted(&enabled.join(", "), use_color));
    println!();

    println!("{}", fmt_heading("Next steps:", use_color));
    println!("  {}", fmt_muted("skillsync fetch    # Download skills", use_color));
    println!("  {}", fmt_muted("skillsync push     # Copy skills to targets", use_color));
    println!("  {}", fmt_muted("skillsync status   # Check status", use_color));
    println!();
    Ok(())
}

/// Write the default config for a layout and return it.
fn initialize(layout: &Layout) -> Result<Config> {
    let config = Config::defaults(layout)?;
    config.save(layout)?;
    Ok(config)
}
