//! Commit creation through the system `git` binary.
//!
//! Shelling out inherits the user's git config, hooks and commit signing,
//! none of which libgit2 applies on its own.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Run `git commit -m <message>` in `workdir`.
pub fn git_commit(workdir: &Path, message: &str) -> Result<(), GitError> {
    run_git(workdir, &["commit", "-m", message])
}

/// Run a git command and map a non-zero exit to [`GitError::CommitFailed`].
fn run_git(workdir: &Path, args: &[&str]) -> Result<(), GitError> {
    let git = which::which("git").map_err(|_| GitError::GitNotInstalled)?;

    debug!("Running git {} in {}", args[0], workdir.display());

    let output = Command::new(git)
        .args(args)
        .current_dir(workdir)
        .output()
        .map_err(GitError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };

        return Err(GitError::CommitFailed {
            detail: if detail.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                detail
            },
        });
    }

    Ok(())
}
