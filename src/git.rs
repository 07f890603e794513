//! Shallow repository checkout through the `git` executable.

use std::{path::Path, process::Stdio};

use tokio::process::Command;

use crate::error::{Error, Result};

/// Capability to materialize a shallow working copy of a repository.
pub(crate) trait Cloner {
    /// Clone `url` into `dest`, which must not exist yet.
    async fn shallow_clone(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Cloner backed by the `git` command line client.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Executable name or path.
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCli {
    /// Build the clone command for a URL and destination.
    fn clone_command(&self, url: &str, dest: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("clone")
            .arg("--depth")
            .arg("1")
            .arg("--quiet")
            .arg(url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl Cloner for GitCli {
    async fn shallow_clone(&self, url: &str, dest: &Path) -> Result<()> {
        let output = self
            .clone_command(url, dest)
            .output()
            .await
            .map_err(|error| Error::GitSpawn { source: error })?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let message = if !stderr.is_empty() {
            stderr
        } else if !stdout.is_empty() {
            stdout
        } else {
            format!("exited with {}", output.status)
        };
        Err(Error::GitClone {
            url: url.to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{Cloner, GitCli};
    use crate::error::Error;

    #[tokio::test]
    async fn reports_missing_executable() {
        let dir = tempdir().expect("tempdir");
        let git = GitCli {
            program: "skillsync-no-such-git".to_string(),
        };

        let error = git
            .shallow_clone("https://example.com/repo", &dir.path().join("clone"))
            .await
            .expect_err("clone should fail");
        assert!(matches!(error, Error::GitSpawn { .. }));
    }
}
