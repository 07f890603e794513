//! Implementation of the `skillsync push` command.

use std::{collections::BTreeSet, fs, path::Path};

use crate::{
    catalog::{CollectedSkill, Store},
    commands::{ColorChoice, MARK_FAILED, MARK_OK, MARK_SKIPPED, TARGET_WIDTH},
    config::{Config, Target},
    diagnostics::Diagnostics,
    error::{Error, Result},
    files::{clear_dir, copy_dir, remove_path},
    palette::{fmt_failure, fmt_heading, fmt_muted, fmt_success, fmt_warning, pad},
    paths::display_path,
};

/// Result of pushing to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetResult {
    /// The target is disabled and was left alone.
    Disabled,
    /// The target now holds this many skills.
    Synced(usize),
    /// Writing the target failed.
    Failed(String),
}

/// Per-target push outcome.
#[derive(Debug, Clone)]
pub struct TargetOutcome {
    /// Target name.
    pub(crate) name: String,
    /// What happened to the target.
    pub(crate) result: TargetResult,
}

/// Outcome of a push across all targets.
#[derive(Debug, Clone)]
pub enum PushOutcome {
    /// The store held no skills, so no target was touched.
    NoSkills,
    /// Skills were distributed to the targets.
    Pushed {
        /// Number of skill directories collected.
        skills: usize,
        /// Number of sources that contributed skills.
        sources: usize,
        /// Per-target results in configuration order.
        targets: Vec<TargetOutcome>,
    },
}

/// Execute the push command; `deprecated` marks invocation through `sync`.
pub async fn run(
    color: ColorChoice,
    verbose: bool,
    config: &Config,
    deprecated: bool,
) -> Result<()> {
    let diagnostics = Diagnostics::new(verbose);
    let use_color = color.enabled();
    let store = Store::for_config(config);

    if deprecated {
        eprintln!(
            "{}",
            fmt_warning(
                "`skillsync sync` is deprecated; use `skillsync push` instead.",
                use_color
            )
        );
    }

    println!();
    println!("{}", fmt_heading("Pushing skills to targets...", use_color));
    println!();

    match push_all(config, &store, &diagnostics) {
        PushOutcome::NoSkills => {
            println!(
                "  {}",
                fmt_muted("No skills found. Run `skillsync fetch` first.", use_color)
            );
            println!();
        }
        PushOutcome::Pushed {
            skills,
            sources,
            targets,
        } => {
            println!(
                "  {}",
                fmt_muted(
                    &format!("Source: {skills} skills from {sources} sources"),
                    use_color
                )
            );
            println!();
            for outcome in &targets {
                print_outcome(outcome, use_color);
            }
            println!();
            println!("{}", fmt_heading("Done.", use_color));
            println!();
        }
    }
    Ok(())
}

/// Copy every collected skill into every enabled target.
pub(crate) fn push_all(
    config: &Config,
    store: &Store,
    diagnostics: &Diagnostics,
) -> PushOutcome {
    let skills = store.collect(config, diagnostics);
    if skills.is_empty() {
        return PushOutcome::NoSkills;
    }
    warn_on_collisions(&skills, diagnostics);

    let sources = skills
        .iter()
        .map(|skill| skill.source.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let mut targets = Vec::new();
    for (name, target) in config.targets() {
        let result = if target.enabled {
            match push_target(target, &skills) {
                Ok(count) => TargetResult::Synced(count),
                Err(error) => TargetResult::Failed(error.first_line()),
            }
        } else {
            TargetResult::Disabled
        };
        targets.push(TargetOutcome {
            name: name.clone(),
            result,
        });
    }

    PushOutcome::Pushed {
        skills: skills.len(),
        sources,
        targets,
    }
}

/// Replace a target's contents with the collected skills.
fn push_target(target: &Target, skills: &[CollectedSkill]) -> Result<usize> {
    ensure_dir(&target.path)?;
    clear_dir(&target.path)?;

    let mut names = BTreeSet::new();
    for skill in skills {
        let dest = target.path.join(&skill.name);
        // Later sources replace earlier ones with the same directory name.
        remove_path(&dest)?;
        copy_dir(&skill.dir, &dest)?;
        names.insert(skill.name.as_str());
    }
    Ok(names.len())
}

/// Create a target directory if it is missing.
fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|error| Error::StoreWrite {
        path: path.to_path_buf(),
        source: error,
    })
}

/// Note skills whose directory name appears in more than one source.
fn warn_on_collisions(skills: &[CollectedSkill], diagnostics: &Diagnostics) {
    let mut seen = BTreeSet::new();
    for skill in skills {
        if !seen.insert(skill.name.as_str()) {
            diagnostics.note(format!(
                "skill '{}' from {} replaces an earlier copy ({})",
                skill.name,
                skill.source,
                display_path(&skill.dir)
            ));
        }
    }
}

/// Print one target outcome line.
fn print_outcome(outcome: &TargetOutcome, use_color: bool) {
    let name = pad(&outcome.name, TARGET_WIDTH);
    let line = match &outcome.result {
        TargetResult::Disabled => format!(
            "{} {name} {}",
            fmt_muted(MARK_SKIPPED, use_color),
            fmt_muted("disabled", use_color)
        ),
        TargetResult::Synced(count) => format!(
            "{} {name} {}",
            fmt_success(MARK_OK, use_color),
            fmt_success(&format!("synced ({count} skills)"), use_color)
        ),
        TargetResult::Failed(message) => format!(
            "{} {name} {}",
            fmt_failure(MARK_FAILED, use_color),
            fmt_failure(message, use_color)
        ),
    };
    println!("  {line}");
}
