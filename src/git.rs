//! # Git Operations
//!
//! Version-control access for git sources goes through the `GitOperations`
//! trait so the fetchers can be exercised with a mock in tests. The default
//! implementation, `SystemGit`, shells out to the system `git` command, which
//! automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Git is only probed when at least one configured source is a URL; builds
//! made purely of directories and archives never touch it.

use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Reports the git version, failing if git cannot be used at all.
    fn version(&self) -> Result<String>;

    /// Clones `url` into the empty directory `target_dir`.
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Checks out `branch` (or any tree-ish) in the clone at `repo_dir`.
    fn checkout(&self, repo_dir: &Path, branch: &str) -> Result<()>;

    /// Writes a zip of `treeish` to `output`, every member prefixed with
    /// `prefix`.
    fn archive_zip(&self, repo_dir: &Path, treeish: &str, prefix: &str, output: &Path)
        -> Result<()>;
}

/// Ensure git is usable before any git source is dispatched.
pub fn ensure_available(git: &dyn GitOperations) -> Result<()> {
    match git.version() {
        Ok(version) => {
            debug!("Using {}", version);
            Ok(())
        }
        Err(e) => Err(Error::VersionControlUnavailable {
            message: e.to_string(),
            hint: Some("Install git and make sure it is on PATH".to_string()),
        }),
    }
}

/// `GitOperations` backed by the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct SystemGit;

impl SystemGit {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, location: &str, command_name: &str, command: &mut Command) -> Result<Output> {
        let output = command.output().map_err(|e| Error::GitCommand {
            command: command_name.to_string(),
            location: location.to_string(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);

            // Provide helpful error message for common auth failures
            let stderr = if stderr.contains("Authentication failed")
                || stderr.contains("Permission denied")
                || stderr.contains("Could not read from remote repository")
            {
                format!(
                    "Authentication failed. Make sure you have access to the repository.\n\
                    For private repos, ensure you have:\n\
                    - SSH key added to ssh-agent\n\
                    - Git credentials configured\n\
                    - Personal access token set up\n\
                    Error: {}",
                    stderr.trim()
                )
            } else {
                stderr.trim().to_string()
            };

            return Err(Error::GitCommand {
                command: command_name.to_string(),
                location: location.to_string(),
                stderr,
            });
        }

        Ok(output)
    }
}

impl GitOperations for SystemGit {
    fn version(&self) -> Result<String> {
        let output = self.run("git", "--version", Command::new("git").arg("--version"))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
        debug!("Cloning {} into {}", url, target_dir.display());
        self.run(
            url,
            "clone",
            Command::new("git")
                .args(["clone", "--quiet", url])
                .arg(target_dir),
        )?;
        Ok(())
    }

    fn checkout(&self, repo_dir: &Path, branch: &str) -> Result<()> {
        debug!("Checking out {} in {}", branch, repo_dir.display());
        self.run(
            &repo_dir.display().to_string(),
            &format!("checkout {}", branch),
            Command::new("git")
                .arg("-C")
                .arg(repo_dir)
                .args(["checkout", "--quiet", branch]),
        )?;
        Ok(())
    }

    fn archive_zip(
        &self,
        repo_dir: &Path,
        treeish: &str,
        prefix: &str,
        output: &Path,
    ) -> Result<()> {
        // `-o` is resolved against the `-C` directory
        let output = std::path::absolute(output)?;
        self.run(
            &repo_dir.display().to_string(),
            &format!("archive {}", treeish),
            Command::new("git")
                .arg("-C")
                .arg(repo_dir)
                .args(["archive", "--format=zip"])
                .arg(format!("--prefix={}", prefix))
                .arg("-o")
                .arg(&output)
                .arg(treeish),
        )?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockGit;
    use super::*;

    #[test]
    fn test_ensure_available_maps_failure() {
        let err = ensure_available(&MockGit::unavailable()).unwrap_err();
        assert_eq!(
            err.kind(),
            crate::error::ErrorKind::VersionControlUnavailable
        );
        assert!(err.to_string().contains("hint:"));
    }

    #[test]
    fn test_ensure_available_ok() {
        assert!(ensure_available(&MockGit::with_files(&[])).is_ok());
    }
}
