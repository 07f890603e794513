//! Implementation of the `skillsync fetch` command.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    catalog::Store,
    commands::{ColorChoice, MARK_FAILED, MARK_OK, MARK_SKIPPED, SOURCE_WIDTH},
    config::{Config, Source, is_local_source},
    diagnostics::Diagnostics,
    error::{Error, Result},
    files::{copy_dir, remove_path},
    git::{Cloner, GitCli},
    palette::{fmt_failure, fmt_heading, fmt_muted, fmt_success, pad},
    paths::display_path,
};

/// Why a source was not fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The source is disabled.
    Disabled,
    /// The source is maintained locally.
    Local,
    /// The source has no URL.
    NoUrl,
}

/// Result of fetching one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// The slot was replaced with a fresh checkout.
    Fetched,
    /// Nothing was done.
    Skipped(SkipReason),
    /// The fetch failed; holds the first line of the error.
    Failed(String),
}

/// Per-source fetch outcome.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Source name.
    pub(crate) name: String,
    /// What happened to the source.
    pub(crate) status: FetchStatus,
}

/// Execute the fetch command.
pub async fn run(
    color: ColorChoice,
    verbose: bool,
    config: &Config,
    filter: Option<&str>,
) -> Result<()> {
    let mut diagnostics = Diagnostics::new(verbose);
    let use_color = color.enabled();
    let store = Store::for_config(config);
    let selected = select_sources(config, filter)?;
    let git = GitCli::default();

    println!();
    println!("{}", fmt_heading("Fetching skills...", use_color));
    println!();

    fetch_sources(&store, &git, &selected, &mut diagnostics, |outcome| {
        print_outcome(outcome, use_color);
    })
    .await;

    println!();
    println!(
        "{}",
        fmt_muted(
            &format!("Stored at: {}", display_path(store.root())),
            use_color
        )
    );
    println!();
    diagnostics.print_warning_summary();
    Ok(())
}

/// Fetch the selected sources in order, reporting each outcome as it completes.
pub(crate) async fn fetch_sources<C: Cloner>(
    store: &Store,
    cloner: &C,
    selected: &[&(String, Source)],
    diagnostics: &mut Diagnostics,
    mut report: impl FnMut(&FetchOutcome),
) -> Vec<FetchOutcome> {
    let mut outcomes = Vec::new();
    for (name, source) in selected.iter().copied() {
        let status = fetch_source(store, cloner, name, source, diagnostics).await;
        let outcome = FetchOutcome {
            name: name.clone(),
            status,
        };
        report(&outcome);
        outcomes.push(outcome);
    }
    outcomes
}

/// Pick the sources to fetch, failing when a named source is not configured.
fn select_sources<'a>(
    config: &'a Config,
    filter: Option<&str>,
) -> Result<Vec<&'a (String, Source)>> {
    let Some(filter) = filter else {
        return Ok(config.sources().iter().collect());
    };
    let selected = config
        .sources()
        .iter()
        .filter(|(name, _)| name == filter)
        .collect::<Vec<_>>();
    if selected.is_empty() {
        return Err(Error::SourceNotFound {
            name: filter.to_string(),
        });
    }
    Ok(selected)
}

/// Fetch a single source, isolating any failure to this source.
async fn fetch_source<C: Cloner>(
    store: &Store,
    cloner: &C,
    name: &str,
    source: &Source,
    diagnostics: &mut Diagnostics,
) -> FetchStatus {
    if !source.enabled {
        return FetchStatus::Skipped(SkipReason::Disabled);
    }
    if is_local_source(name) {
        return FetchStatus::Skipped(SkipReason::Local);
    }
    let Some(url) = source.url.as_deref() else {
        return FetchStatus::Skipped(SkipReason::NoUrl);
    };

    let slot = store.slot(name);
    let staging = staging_path(&slot);
    diagnostics.note(format!("cloning {url} into {}", display_path(&staging)));

    match install(cloner, url, source.subdir.as_deref(), &slot, &staging).await {
        Ok(()) => FetchStatus::Fetched,
        Err(error) => {
            for leftover in [&staging, &slot] {
                if let Err(cleanup) = remove_path(leftover) {
                    diagnostics.warn(cleanup.to_string());
                }
            }
            FetchStatus::Failed(error.first_line())
        }
    }
}

/// Replace a slot with a fresh shallow checkout of a repository.
async fn install<C: Cloner>(
    cloner: &C,
    url: &str,
    subdir: Option<&str>,
    slot: &Path,
    staging: &Path,
) -> Result<()> {
    if let Some(parent) = slot.parent() {
        fs::create_dir_all(parent).map_err(|error| Error::StoreWrite {
            path: parent.to_path_buf(),
            source: error,
        })?;
    }
    remove_path(slot)?;
    remove_path(staging)?;

    cloner.shallow_clone(url, staging).await?;

    match subdir {
        Some(subdir) => {
            let subdir_path = staging.join(subdir);
            if !subdir_path.is_dir() {
                return Err(Error::SubdirNotFound {
                    subdir: subdir.to_string(),
                });
            }
            copy_dir(&subdir_path, slot)?;
            remove_path(staging)
        }
        None => {
            fs::rename(staging, slot).map_err(|error| Error::StoreWrite {
                path: slot.to_path_buf(),
                source: error,
            })?;
            remove_path(&slot.join(".git"))
        }
    }
}

/// Return the temporary sibling path used while cloning into a slot.
fn staging_path(slot: &Path) -> PathBuf {
    let mut name = slot
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push("_temp");
    slot.with_file_name(name)
}

/// Print one fetch outcome line.
fn print_outcome(outcome: &FetchOutcome, use_color: bool) {
    let name = pad(&outcome.name, SOURCE_WIDTH);
    let line = match &outcome.status {
        FetchStatus::Fetched => format!(
            "{} {name} {}",
            fmt_success(MARK_OK, use_color),
            fmt_success("fetched", use_color)
        ),
        FetchStatus::Skipped(reason) => format!(
            "{} {name} {}",
            fmt_muted(MARK_SKIPPED, use_color),
            fmt_muted(skip_label(*reason), use_color)
        ),
        FetchStatus::Failed(message) => format!(
            "{} {name} {}",
            fmt_failure(MARK_FAILED, use_color),
            fmt_failure(message, use_color)
        ),
    };
    println!("  {line}");
}

/// Label for a skipped source.
fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Disabled => "skipped (disabled)",
        SkipReason::Local => "skipped (local)",
        SkipReason::NoUrl => "skipped (no URL)",
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::{FetchOutcome, FetchStatus, SkipReason, fetch_sources, select_sources, staging_path};
    use crate::{
        diagnostics::Diagnostics,
        error::{Error, Result},
        testutil::{FAKE_URL_PREFIX, TestFixture, simple_skill},
    };

    async fn fetch(
        fixture: &TestFixture,
        filter: Option<&str>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<FetchOutcome>> {
        let selected = select_sources(fixture.config(), filter)?;
        Ok(fetch_sources(fixture.store(), fixture.cloner(), &selected, diagnostics, |_| {}).await)
    }

    fn statuses(outcomes: &[FetchOutcome]) -> Vec<(&str, &FetchStatus)> {
        outcomes
            .iter()
            .map(|outcome| (outcome.name.as_str(), &outcome.status))
            .collect()
    }

    #[test]
    fn stages_next_to_the_slot() {
        assert_eq!(
            staging_path(Path::new("/store/acme/kit")),
            Path::new("/store/acme/kit_temp")
        );
    }

    #[tokio::test]
    async fn fetches_whole_repository_without_git_metadata() {
        let fixture = TestFixture::new()
            .with_remote_source("acme/kit", None)
            .with_repo_skill("acme/kit", "pdf", &simple_skill("pdf"))
            .with_repo_skill("acme/kit", "docx", &simple_skill("docx"));
        let mut diagnostics = Diagnostics::new(false);

        let outcomes = fetch(&fixture, None, &mut diagnostics)
            .await
            .expect("fetch");

        assert_eq!(statuses(&outcomes), vec![("acme/kit", &FetchStatus::Fetched)]);
        let slot = fixture.store().slot("acme/kit");
        assert_eq!(TestFixture::entry_names(&slot), vec!["docx", "pdf"]);
        assert!(!slot.join(".git").exists());
        assert!(!staging_path(&slot).exists());
    }

    #[tokio::test]
    async fn keeps_only_the_configured_subdirectory() {
        let fixture = TestFixture::new()
            .with_remote_source("acme/kit", Some("skills"))
            .with_repo_skill("acme/kit", "skills/pdf", &simple_skill("pdf"))
            .with_repo_skill("acme/kit", "docs/guide", &simple_skill("guide"));
        let mut diagnostics = Diagnostics::new(false);

        fetch(&fixture, None, &mut diagnostics)
            .await
            .expect("fetch");

        let slot = fixture.store().slot("acme/kit");
        assert_eq!(TestFixture::entry_names(&slot), vec!["pdf"]);
        assert!(!staging_path(&slot).exists());
    }

    #[tokio::test]
    async fn replaces_previous_slot_contents() {
        let fixture = TestFixture::new()
            .with_remote_source("acme/kit", None)
            .with_repo_skill("acme/kit", "pdf", &simple_skill("pdf"))
            .with_store_skill("acme/kit", "stale", &simple_skill("stale"));
        let mut diagnostics = Diagnostics::new(false);

        fetch(&fixture, None, &mut diagnostics)
            .await
            .expect("fetch");

        assert_eq!(
            TestFixture::entry_names(&fixture.store().slot("acme/kit")),
            vec!["pdf"]
        );
    }

    #[tokio::test]
    async fn skips_disabled_and_local_sources() {
        let mut fixture = TestFixture::new()
            .with_remote_source("acme/off", None)
            .with_local_source("local/notes")
            .with_store_skill("acme/off", "kept", &simple_skill("kept"))
            .with_store_skill("local/notes", "mine", &simple_skill("mine"));
        fixture
            .config_mut()
            .set_source_enabled("acme/off", false)
            .expect("disable");
        let mut diagnostics = Diagnostics::new(false);

        let outcomes = fetch(&fixture, None, &mut diagnostics)
            .await
            .expect("fetch");

        assert_eq!(
            statuses(&outcomes),
            vec![
                ("acme/off", &FetchStatus::Skipped(SkipReason::Disabled)),
                ("local/notes", &FetchStatus::Skipped(SkipReason::Local)),
            ]
        );
        assert!(fixture.cloner().calls().is_empty());
        assert_eq!(
            TestFixture::entry_names(&fixture.store().slot("acme/off")),
            vec!["kept"]
        );
        assert_eq!(
            TestFixture::entry_names(&fixture.store().slot("local/notes")),
            vec!["mine"]
        );
    }

    #[tokio::test]
    async fn missing_subdir_fails_without_blocking_siblings() {
        let fixture = TestFixture::new()
            .with_remote_source("acme/broken", Some("skills"))
            .with_remote_source("acme/kit", None)
            .with_repo_skill("acme/broken", "other/pdf", &simple_skill("pdf"))
            .with_repo_skill("acme/kit", "docx", &simple_skill("docx"));
        let mut diagnostics = Diagnostics::new(false);

        let outcomes = fetch(&fixture, None, &mut diagnostics)
            .await
            .expect("fetch");

        assert_eq!(
            statuses(&outcomes),
            vec![
                (
                    "acme/broken",
                    &FetchStatus::Failed("Subdir \"skills\" not found".to_string())
                ),
                ("acme/kit", &FetchStatus::Fetched),
            ]
        );
        let broken = fixture.store().slot("acme/broken");
        assert!(!broken.exists());
        assert!(!staging_path(&broken).exists());
        assert!(fixture.store().slot("acme/kit").join("docx").is_dir());
    }

    #[tokio::test]
    async fn clone_failures_report_the_first_line() {
        let fixture = TestFixture::new().with_remote_source("acme/missing", None);
        let mut diagnostics = Diagnostics::new(false);

        let outcomes = fetch(&fixture, None, &mut diagnostics)
            .await
            .expect("fetch");

        let expected = format!(
            "git clone {FAKE_URL_PREFIX}acme/missing failed: fatal: repository '{FAKE_URL_PREFIX}acme/missing' not found"
        );
        assert_eq!(
            statuses(&outcomes),
            vec![("acme/missing", &FetchStatus::Failed(expected))]
        );
    }

    #[tokio::test]
    async fn filters_to_one_source() {
        let fixture = TestFixture::new()
            .with_remote_source("acme/kit", None)
            .with_remote_source("acme/other", None)
            .with_repo_skill("acme/kit", "pdf", &simple_skill("pdf"))
            .with_repo_skill("acme/other", "docx", &simple_skill("docx"));
        let mut diagnostics = Diagnostics::new(false);

        let outcomes = fetch(&fixture, Some("acme/other"), &mut diagnostics)
            .await
            .expect("fetch");

        assert_eq!(statuses(&outcomes), vec![("acme/other", &FetchStatus::Fetched)]);
        assert_eq!(
            fixture.cloner().calls(),
            vec![format!("{FAKE_URL_PREFIX}acme/other")]
        );
        assert!(!fixture.store().slot("acme/kit").exists());
    }

    #[tokio::test]
    async fn unknown_filter_is_an_error() {
        let fixture = TestFixture::new().with_remote_source("acme/kit", None);
        let mut diagnostics = Diagnostics::new(false);

        let error = fetch(&fixture, Some("acme/nope"), &mut diagnostics)
            .await
            .expect_err("fetch should fail");

        assert!(matches!(error, Error::SourceNotFound { .. }));
        assert!(fixture.cloner().calls().is_empty());
        assert!(!fs::exists(fixture.store().root()).unwrap_or(false));
    }
}
