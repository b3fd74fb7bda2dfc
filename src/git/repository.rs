//! [`RepositorySnapshot`] backed by git2, with commits through the git CLI.

use std::path::Path;

use git2::{Diff, DiffFormat, DiffOptions, ErrorCode, Repository, Tree};
use tracing::{debug, warn};

use crate::error::GitError;

use super::RepositorySnapshot;
use super::command::git_commit;
use super::exclude::ExcludePatterns;

/// A git repository opened from a path inside its work tree.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository containing `path`, searching parent directories.
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Directory `git commit` runs in.
    pub fn workdir(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Diff of HEAD against the index, optionally restricted to exact paths.
    fn staged_diff(&self, paths: Option<&[String]>) -> Result<Diff<'_>, GitError> {
        let head_tree = resolve_head_tree(&self.repo)?;

        let mut opts = DiffOptions::new();
        if let Some(paths) = paths {
            opts.disable_pathspec_match(true);
            for p in paths {
                opts.pathspec(p);
            }
        }

        self.repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
            .map_err(GitError::DiffFailed)
    }
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch), so that
/// everything in the index counts as staged.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the paths touched by each delta of a diff.
fn collect_paths(diff: &Diff<'_>) -> Vec<String> {
    let mut paths: Vec<String> = diff
        .deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .filter(|p| !p.is_empty())
        .collect();

    paths.sort();
    paths.dedup();
    paths
}

/// Render a diff as unified patch text.
fn patch_text(diff: &Diff<'_>) -> Result<String, GitError> {
    let mut text = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(GitError::DiffFailed)?;

    Ok(text)
}

impl RepositorySnapshot for GitRepository {
    fn staged_files(&self, exclude: &ExcludePatterns) -> Result<Vec<String>, GitError> {
        let diff = self.staged_diff(None)?;
        let all = collect_paths(&diff);
        let total = all.len();
        let kept = exclude.filter(all);

        if kept.len() != total {
            debug!("Excluded {} staged file(s) from the diff", total - kept.len());
        }

        Ok(kept)
    }

    fn diff(&self, exclude: &ExcludePatterns) -> Result<String, GitError> {
        let paths = self.staged_files(exclude)?;
        if paths.is_empty() {
            return Ok(String::new());
        }

        let diff = self.staged_diff(Some(&paths))?;
        patch_text(&diff)
    }

    fn recent_logs(&self, max_count: usize) -> Result<Vec<String>, GitError> {
        if max_count == 0 {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk().map_err(GitError::LogFailed)?;
        match revwalk.push_head() {
            Ok(()) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(GitError::LogFailed(e)),
        }

        let mut messages = Vec::with_capacity(max_count);
        for oid in revwalk.take(max_count) {
            let oid = oid.map_err(GitError::LogFailed)?;
            let commit = self.repo.find_commit(oid).map_err(GitError::LogFailed)?;
            let message = String::from_utf8_lossy(commit.message_bytes())
                .trim_end()
                .to_string();
            if message.is_empty() {
                warn!("Skipping commit {} with an empty message", oid);
                continue;
            }
            messages.push(message);
        }

        // Revwalk yields newest first.
        messages.reverse();
        Ok(messages)
    }

    fn staged_tree(&self) -> Result<String, GitError> {
        let mut index = self.repo.index().map_err(GitError::DiffFailed)?;
        // Pick up staging done by other processes since the last read.
        index.read(false).map_err(GitError::DiffFailed)?;
        let oid = index.write_tree().map_err(GitError::DiffFailed)?;
        Ok(oid.to_string())
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        git_commit(self.workdir(), message)
    }
}
