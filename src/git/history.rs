use git2::{Commit, ErrorCode, Oid, Repository, Sort, Tree};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::git::materialize::{artifact_name, checkout_path, write_version};
use crate::git::path::{normalize, repo_path_string};
use crate::git::repository::{commit_to_ref, workdir, GitRepository};
use crate::git::status::file_status;
use crate::models::{CommitRef, FileStatus, HistoryRecord};

/// Commits reachable from HEAD that changed `path`, newest first.
///
/// Only single-parent commits are considered. Merges and the root commit are
/// skipped, so a file added in the root commit has no entry for it.
pub fn resolve_history(repo: &Repository, path: &Path) -> Result<Vec<CommitRef>> {
    let Some(mut revwalk) = head_revwalk(repo)? else {
        return Ok(Vec::new());
    };
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

    let mut commits = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        if commit_changes_path(&commit, path)? {
            tracing::debug!("{} changed {}", commit.id(), path.display());
            commits.push(commit_to_ref(&commit));
        }
    }

    Ok(commits)
}

/// Whether this linear commit introduced a new version of `path`.
fn commit_changes_path(commit: &Commit, path: &Path) -> Result<bool> {
    if commit.parent_count() != 1 {
        return Ok(false);
    }

    let Some(current) = entry_id(&commit.tree()?, path)? else {
        return Ok(false);
    };
    let previous = entry_id(&commit.parent(0)?.tree()?, path)?;

    Ok(previous != Some(current))
}

/// Id of the entry at `path`, or `None` if the tree does not contain it.
fn entry_id(tree: &Tree, path: &Path) -> Result<Option<Oid>> {
    match tree.get_path(path) {
        Ok(entry) => Ok(Some(entry.id())),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// A revwalk seeded from HEAD, or `None` while HEAD has no commit yet.
fn head_revwalk(repo: &Repository) -> Result<Option<git2::Revwalk<'_>>> {
    if let Err(e) = repo.head() {
        return match e.code() {
            ErrorCode::UnbornBranch | ErrorCode::NotFound => Ok(None),
            _ => Err(e.into()),
        };
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    Ok(Some(revwalk))
}

impl GitRepository {
    /// Every version of `file` in history, each written out as an artifact.
    ///
    /// Fails as a whole if any commit cannot be read or any artifact cannot
    /// be written; no partial collection is returned.
    pub fn file_history<P: AsRef<Path>>(&self, file: P) -> Result<Vec<HistoryRecord>> {
        let file = file.as_ref();
        tracing::info!("Resolving history of {} in {}", file.display(), self.path.display());

        self.with_repo(|repo| {
            let root = workdir(repo)?;
            let relative = normalize(root, file);
            let absolute = root.join(&relative);
            let status = file_status(repo, &relative);

            let commits = resolve_history(repo, &relative)?;
            let mut records = Vec::with_capacity(commits.len());

            for commit in &commits {
                let destination = self
                    .artifact_dir
                    .join(artifact_name(&commit.oid, &relative));
                write_version(repo, &relative, &commit.oid, &destination)?;

                records.push(
                    HistoryRecord::new(repo_path_string(&relative), absolute.clone())
                        .with_commit(commit)
                        .with_status(status)
                        .with_artifact(destination),
                );
            }

            tracing::info!("Found {} versions of {}", records.len(), relative.display());
            Ok(records)
        })
    }

    /// Whether `file` exists in any commit reachable from HEAD.
    pub fn file_exists<P: AsRef<Path>>(&self, file: P) -> Result<bool> {
        let file = file.as_ref();
        self.with_repo(|repo| {
            let relative = normalize(workdir(repo)?, file);
            let Some(revwalk) = head_revwalk(repo)? else {
                return Ok(false);
            };

            for oid in revwalk {
                let found = repo
                    .find_commit(oid?)
                    .and_then(|commit| commit.tree())
                    .map(|tree| tree.get_path(&relative).is_ok());
                match found {
                    Ok(true) => return Ok(true),
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!("Stopped searching for {}: {}", relative.display(), e);
                        return Ok(false);
                    }
                }
            }

            Ok(false)
        })
    }

    /// Put `file` back to its most recent committed version.
    ///
    /// Returns `false` when the file has no history to go back to, or when a
    /// non-forced checkout left local changes in place.
    pub fn file_undo_checkout<P: AsRef<Path>>(&self, file: P, force: bool) -> Result<bool> {
        let file = file.as_ref();
        tracing::info!("Undoing checkout of {} (force: {})", file.display(), force);

        self.with_repo(|repo| {
            let relative = normalize(workdir(repo)?, file);
            let commits = resolve_history(repo, &relative)?;

            let Some(latest) = commits.first() else {
                tracing::info!("{} has no history, nothing to undo", relative.display());
                return Ok(false);
            };

            match checkout_path(repo, &relative, &latest.oid, force) {
                Ok(()) if force => Ok(true),
                // Safe mode skips locally modified files without reporting a conflict
                Ok(()) => {
                    let status = file_status(repo, &relative);
                    if status != FileStatus::Unaltered {
                        tracing::warn!("Checkout of {} left it {:?}", relative.display(), status);
                    }
                    Ok(status == FileStatus::Unaltered)
                }
                Err(AppError::Git(e)) if !force && e.code() == ErrorCode::Conflict => {
                    tracing::warn!("Checkout of {} refused: {}", relative.display(), e.message());
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        })
    }
}
