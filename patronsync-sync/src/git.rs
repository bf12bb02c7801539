//! VCS gateway — branch preparation, staging, commit, and push via the
//! `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use patronsync_core::types::BranchPolicy;

use crate::error::{io_err, SyncError};

/// Author name paired with the configured author email on the update commit.
pub const GIT_AUTHOR_NAME: &str = "github-actions";

/// Version-control operations the pipeline depends on.
///
/// The pipeline only ever talks to this trait; [`GitCli`] is the production
/// implementation and tests substitute in-memory fakes.
pub trait VcsGateway {
    /// Select the working branch according to `policy`, leaving it checked
    /// out.
    fn prepare_branch(
        &self,
        branch: &str,
        base: &str,
        policy: BranchPolicy,
    ) -> Result<(), SyncError>;

    /// Stage every modification in the working tree.
    fn stage_all(&self) -> Result<(), SyncError>;

    /// Whether the staging area holds any pending changes. This is the
    /// authoritative "anything to commit" signal — not the in-memory
    /// did-substitution-run flag, since substitution can reproduce content
    /// that is already on disk.
    fn has_staged_changes(&self) -> Result<bool, SyncError>;

    /// Commit the staged changes with the given message and author email.
    fn commit(&self, message: &str, author_email: &str) -> Result<(), SyncError>;

    /// Force-push the working branch to `origin`.
    fn push_force(&self, branch: &str) -> Result<(), SyncError>;
}

// ---------------------------------------------------------------------------
// GitCli
// ---------------------------------------------------------------------------

/// [`VcsGateway`] implementation shelling out to the `git` binary inside a
/// repository checkout.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn output(&self, args: &[&str]) -> Result<Output, SyncError> {
        Command::new("git")
            .current_dir(&self.workdir)
            .args(args)
            .output()
            .map_err(|e| io_err("git", e))
    }

    /// Run a git command, failing with captured stdout/stderr on a non-zero
    /// exit status.
    fn run(&self, args: &[&str]) -> Result<(), SyncError> {
        let output = self.output(args)?;
        if output.status.success() {
            return Ok(());
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(SyncError::Vcs(format!(
            "`git {}` failed (status {}): {} {}",
            args.join(" "),
            output.status,
            stdout,
            stderr
        )))
    }

    fn branch_exists(&self, branch: &str) -> Result<bool, SyncError> {
        let rev = format!("refs/heads/{branch}");
        let output = self.output(&["rev-parse", "--verify", "--quiet", &rev])?;
        Ok(output.status.success())
    }
}

impl VcsGateway for GitCli {
    fn prepare_branch(
        &self,
        branch: &str,
        base: &str,
        policy: BranchPolicy,
    ) -> Result<(), SyncError> {
        match policy {
            BranchPolicy::ForceReset => {
                log::info!("force-resetting branch '{branch}' onto '{base}'");
                self.run(&["checkout", "-B", branch, base])
            }
            BranchPolicy::Reuse if self.branch_exists(branch)? => {
                log::info!("reusing branch '{branch}', fast-forwarding from '{base}'");
                self.run(&["checkout", branch])?;
                // A fast-forward that cannot apply means the branch diverged
                // from the base; that is fatal rather than silently mixing
                // policies.
                self.run(&["merge", "--ff-only", base])
            }
            BranchPolicy::Reuse => {
                log::info!("creating branch '{branch}' from '{base}'");
                self.run(&["checkout", "-b", branch, base])
            }
        }
    }

    fn stage_all(&self) -> Result<(), SyncError> {
        self.run(&["add", "--all"])
    }

    fn has_staged_changes(&self) -> Result<bool, SyncError> {
        let output = self.output(&["diff", "--cached", "--quiet"])?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                Err(SyncError::Vcs(format!(
                    "`git diff --cached --quiet` failed (status {}): {stderr}",
                    output.status
                )))
            }
        }
    }

    fn commit(&self, message: &str, author_email: &str) -> Result<(), SyncError> {
        let name = format!("user.name={GIT_AUTHOR_NAME}");
        let email = format!("user.email={author_email}");
        self.run(&["-c", &name, "-c", &email, "commit", "-m", message])
    }

    fn push_force(&self, branch: &str) -> Result<(), SyncError> {
        self.run(&["push", "--force", "origin", branch])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_surfaces_stderr_on_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let git = GitCli::new(tmp.path());
        // Not a repository: any porcelain command fails with context.
        let err = git.run(&["status"]).expect_err("must fail outside a repo");
        let message = err.to_string();
        assert!(message.contains("`git status` failed"), "got: {message}");
    }
}
