//! Test utilities for setting up isolated skillsync environments.
//!
//! `TestFixture` owns a temporary directory holding a config home, a store,
//! target directories, and fixture repositories served by `FakeCloner`.

#![allow(dead_code)]

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    catalog::Store,
    config::Config,
    error::{Error, Result},
    files::copy_dir,
    git::Cloner,
    paths::Layout,
    skill::SKILL_FILE_NAME,
};

/// URL prefix understood by `FakeCloner`.
pub const FAKE_URL_PREFIX: &str = "https://git.example.com/";

/// Skill document with name and description frontmatter.
pub fn skill_content(name: &str, description: &str, body: &str) -> String {
    format!("---\nname: {name}\ndescription: {description}\n---\n{body}")
}

/// Simple skill document with just name and description.
pub fn simple_skill(name: &str) -> String {
    skill_content(name, &format!("Description for {name}"), "")
}

/// Cloner that copies fixture repositories instead of running git.
#[derive(Debug)]
pub struct FakeCloner {
    /// Directory holding one fixture repository per `owner/repo` name.
    repos: PathBuf,
    /// URLs passed to `shallow_clone`, in call order.
    calls: RefCell<Vec<String>>,
}

impl FakeCloner {
    /// Return the URLs cloned so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Cloner for FakeCloner {
    async fn shallow_clone(&self, url: &str, dest: &Path) -> Result<()> {
        self.calls.borrow_mut().push(url.to_string());
        let repo = url
            .strip_prefix(FAKE_URL_PREFIX)
            .map(|name| self.repos.join(name))
            .filter(|repo| repo.is_dir())
            .ok_or_else(|| Error::GitClone {
                url: url.to_string(),
                message: format!("fatal: repository '{url}' not found\nsecond line"),
            })?;
        copy_dir(&repo, dest)?;
        let git_dir = dest.join(".git");
        fs::create_dir_all(&git_dir).expect("create .git");
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").expect("write HEAD");
        Ok(())
    }
}

/// Test fixture for isolated config, store, target, and repository directories.
pub struct TestFixture {
    /// Root temp directory (holds everything).
    root: TempDir,
    /// Layout rooted inside the temp directory.
    layout: Layout,
    /// Config under test, starting with no sources or targets.
    config: Config,
    /// Store matching the config.
    store: Store,
    /// Fake cloner serving fixture repositories.
    cloner: FakeCloner,
}

impl TestFixture {
    /// Create a new test fixture with an empty config.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let home = root.path().join("home");
        fs::create_dir_all(&home).expect("create home dir");
        let repos = root.path().join("repos");
        fs::create_dir_all(&repos).expect("create repos dir");

        let layout = Layout::new(home);
        let config = Config::empty(layout.default_store_dir());
        let store = Store::for_config(&config);
        let cloner = FakeCloner {
            repos,
            calls: RefCell::new(Vec::new()),
        };

        Self {
            root,
            layout,
            config,
            store,
            cloner,
        }
    }

    /// Add an enabled source served by the fake cloner.
    pub fn with_remote_source(mut self, name: &str, subdir: Option<&str>) -> Self {
        let url = format!("{FAKE_URL_PREFIX}{name}");
        self.config
            .add_source(name, Some(&url), subdir)
            .expect("add source");
        self
    }

    /// Add a local source.
    pub fn with_local_source(mut self, name: &str) -> Self {
        self.config.add_source(name, None, None).expect("add source");
        self
    }

    /// Add a skill file to a fixture repository at a relative directory.
    pub fn with_repo_skill(self, repo: &str, skill_dir: &str, contents: &str) -> Self {
        let dir = self.repo_dir(repo).join(skill_dir);
        fs::create_dir_all(&dir).expect("create repo skill dir");
        fs::write(dir.join(SKILL_FILE_NAME), contents).expect("write repo skill");
        self
    }

    /// Add a skill directly to a source's store slot.
    pub fn with_store_skill(self, source: &str, skill: &str, contents: &str) -> Self {
        let dir = self.store.slot(source).join(skill);
        fs::create_dir_all(&dir).expect("create store skill dir");
        fs::write(dir.join(SKILL_FILE_NAME), contents).expect("write store skill");
        self
    }

    /// Add an enabled target rooted in the temp directory (not created on disk).
    pub fn with_target(mut self, name: &str) -> Self {
        let path = self.target_dir(name);
        let raw = path.to_string_lossy().to_string();
        self.config
            .add_target(name, Some(&raw), self.root.path())
            .expect("add target");
        self
    }

    /// Write a file inside a target directory, creating it.
    pub fn with_target_file(self, target: &str, relative: &str, contents: &str) -> Self {
        let path = self.target_dir(target).join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create target dir");
        }
        fs::write(path, contents).expect("write target file");
        self
    }

    /// Return the fixture repository directory for a name.
    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        self.cloner.repos.join(repo)
    }

    /// Return the directory used for a target name.
    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.root.path().join("targets").join(name)
    }

    /// Return the layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Return the config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return the config for mutation.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Return the store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Return the fake cloner.
    pub fn cloner(&self) -> &FakeCloner {
        &self.cloner
    }

    /// List the entry names directly inside a directory, sorted.
    pub fn entry_names(path: &Path) -> Vec<String> {
        let mut names = fs::read_dir(path)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.file_name().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_cloner_copies_fixture_repositories() {
        let fixture = TestFixture::new().with_repo_skill("acme/kit", "pdf", &simple_skill("pdf"));
        let dest = fixture.root.path().join("clone");

        fixture
            .cloner()
            .shallow_clone(&format!("{FAKE_URL_PREFIX}acme/kit"), &dest)
            .await
            .expect("clone");

        assert!(dest.join("pdf").join(SKILL_FILE_NAME).is_file());
        assert!(dest.join(".git").is_dir());
        assert_eq!(fixture.cloner().calls().len(), 1);
    }

    #[tokio::test]
    async fn fake_cloner_fails_for_unknown_repositories() {
        let fixture = TestFixture::new();
        let dest = fixture.root.path().join("clone");

        let error = fixture
            .cloner()
            .shallow_clone(&format!("{FAKE_URL_PREFIX}nobody/nothing"), &dest)
            .await
            .expect_err("clone should fail");
        assert!(matches!(error, Error::GitClone { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn adds_store_skill() {
        let fixture = TestFixture::new().with_store_skill("acme/kit", "pdf", &simple_skill("pdf"));
        assert_eq!(
            TestFixture::entry_names(&fixture.store().slot("acme/kit")),
            vec!["pdf"]
        );
    }
}
