//! Implementation of the `skillsync status` command.

use crate::{
    catalog::Store,
    commands::{ColorChoice, MARK_OK, MARK_SKIPPED, SOURCE_WIDTH, TARGET_WIDTH},
    config::Config,
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_heading, fmt_muted, fmt_source_name, fmt_success, pad},
    paths::display_path,
    status::{SourceState, SourceStatus, TargetState, TargetStatus, build_report},
};

/// Execute the status command.
pub async fn run(color: ColorChoice, verbose: bool, config: &Config) -> Result<()> {
    let diagnostics = Diagnostics::new(verbose);
    let use_color = color.enabled();
    let store = Store::for_config(config);
    let report = build_report(config, &store, &diagnostics);

    println!();
    println!("{}", fmt_heading("Sources:", use_color));
    if report.sources.is_empty() {
        println!("  {}", fmt_muted("(none)", use_color));
    }
    for source in &report.sources {
        println!("  {}", source_line(source, use_color));
    }

    println!();
    println!("{}", fmt_heading("Targets:", use_color));
    if report.targets.is_empty() {
        println!("  {}", fmt_muted("(none)", use_color));
    }
    for target in &report.targets {
        println!("  {}", target_line(target, use_color));
    }
    println!();
    Ok(())
}

/// Format one source status line.
fn source_line(source: &SourceStatus, use_color: bool) -> String {
    let state = source_state_label(source.state);
    let mark = if source.enabled {
        fmt_success(MARK_OK, use_color)
    } else {
        fmt_muted(MARK_SKIPPED, use_color)
    };
    let name = pad(&source.name, SOURCE_WIDTH);
    let mut line = format!(
        "{mark} {} {}",
        fmt_source_name(&name, use_color),
        fmt_muted(&state, use_color)
    );
    if !source.enabled {
        line.push(' ');
        line.push_str(&fmt_muted("(disabled)", use_color));
    }
    line
}

/// Describe a source state.
fn source_state_label(state: SourceState) -> String {
    match state {
        SourceState::Fetched(count) => format!("{count} skills"),
        SourceState::Local => "local".to_string(),
        SourceState::NotFetched => "not fetched".to_string(),
    }
}

/// Format one target status line.
fn target_line(target: &TargetStatus, use_color: bool) -> String {
    let mark = if target.state == TargetState::Disabled {
        fmt_muted(MARK_SKIPPED, use_color)
    } else {
        fmt_success(MARK_OK, use_color)
    };
    let name = pad(&target.name, TARGET_WIDTH);
    let state = pad(&target_state_label(target.state), 12);
    format!(
        "{mark} {name} {} {}",
        fmt_muted(&state, use_color),
        fmt_muted(&display_path(&target.path), use_color)
    )
}

/// Describe a target state.
fn target_state_label(state: TargetState) -> String {
    match state {
        TargetState::Disabled => "disabled".to_string(),
        TargetState::Skills(count) => format!("{count} skills"),
        TargetState::Empty => "empty".to_string(),
        TargetState::NotCreated => "not created".to_string(),
    }
}
