//! Historical file versions, written either back into the working tree or
//! out to a standalone file.

use git2::{build::CheckoutBuilder, Blob, ErrorCode, ObjectType, Repository};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::git::path::{normalize, repo_path_string};
use crate::git::repository::{workdir, GitRepository};

/// Check the single file `path` out from `commit_id` into the working tree.
///
/// With `force` local changes are overwritten, so the backend should never
/// report a conflict; if it does anyway that is a broken invariant and comes
/// back as `AppError::UnexpectedConflict`. Without `force` a conflict is a
/// plain `AppError::Git` the caller may decide to tolerate.
///
/// `path` is matched literally, so glob characters in file names select
/// only that file.
pub fn checkout_path(repo: &Repository, path: &Path, commit_id: &str, force: bool) -> Result<()> {
    checkout(repo, path, commit_id, force, true)
}

/// Check everything below `folder` out from `commit_id`. An empty `folder`
/// checks out the whole tree.
pub fn checkout_folder(repo: &Repository, folder: &Path, commit_id: &str, force: bool) -> Result<()> {
    checkout(repo, folder, commit_id, force, false)
}

fn checkout(
    repo: &Repository,
    path: &Path,
    commit_id: &str,
    force: bool,
    literal: bool,
) -> Result<()> {
    let commit = repo
        .revparse_single(commit_id)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|_| AppError::CommitNotFound(commit_id.to_string()))?;

    let mut checkout = CheckoutBuilder::new();
    if force {
        checkout.force();
    } else {
        checkout.safe();
    }
    let pathspec = repo_path_string(path);
    if !pathspec.is_empty() {
        checkout.path(pathspec.as_str());
        checkout.disable_pathspec_match(literal);
    }

    tracing::debug!("Checking out {} at {} (force: {})", pathspec, commit.id(), force);

    match repo.checkout_tree(commit.as_object(), Some(&mut checkout)) {
        Ok(()) => Ok(()),
        Err(e) if force && e.code() == ErrorCode::Conflict => {
            tracing::error!(
                "Forced checkout of {} at {} reported a conflict: {}",
                pathspec,
                commit.id(),
                e.message()
            );
            Err(AppError::UnexpectedConflict {
                path: path.to_path_buf(),
                commit: commit.id().to_string(),
                message: e.message().to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Write the version of `path` identified by `id` to `destination`.
///
/// `id` is a commit (full or abbreviated), in which case `path` is looked up
/// in its tree, or a blob id taken straight from the index. The destination
/// is overwritten with the full content; nothing is merged.
pub fn write_version(
    repo: &Repository,
    path: &Path,
    id: &str,
    destination: &Path,
) -> Result<()> {
    let object = repo
        .revparse_single(id)
        .map_err(|_| AppError::CommitNotFound(id.to_string()))?;

    let blob = match object.kind() {
        Some(ObjectType::Blob) => object.peel_to_blob()?,
        Some(ObjectType::Commit) | Some(ObjectType::Tag) => {
            let tree = object.peel_to_tree()?;
            let entry = tree
                .get_path(path)
                .map_err(|_| AppError::PathNotFound(format!("{} at {}", path.display(), id)))?;
            repo.find_blob(entry.id())
                .map_err(|_| AppError::InvalidPath(format!("{} is not a file", path.display())))?
        }
        _ => return Err(AppError::CommitNotFound(id.to_string())),
    };

    write_blob(&blob, destination)
}

fn write_blob(blob: &Blob, destination: &Path) -> Result<()> {
    let content = String::from_utf8_lossy(blob.content());
    if let Cow::Owned(_) = content {
        tracing::warn!(
            "Blob {} is not valid UTF-8, invalid sequences replaced in {}",
            blob.id(),
            destination.display()
        );
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(destination, content.as_bytes())?;
    Ok(())
}

/// `<id><.ext>` artifact file name, keeping the extension of `path`.
pub fn artifact_name(id: &str, path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!("{}.{}", id, ext.to_string_lossy()),
        None => id.to_string(),
    }
}

impl GitRepository {
    /// Force `file` in the working tree back to its content at `commit_id`.
    /// Returns the path of the working file.
    pub fn file_get_version<P: AsRef<Path>>(&self, file: P, commit_id: &str) -> Result<PathBuf> {
        let file = file.as_ref();
        tracing::info!("Checking out {} at {}", file.display(), commit_id);

        self.with_repo(|repo| {
            let root = workdir(repo)?;
            let relative = normalize(root, file);
            checkout_path(repo, &relative, commit_id, true)?;
            Ok(root.join(relative))
        })
    }

    /// Write the version of `file` at `id` (commit or blob) to `destination`.
    pub fn file_get_version_to<P, Q>(&self, file: P, id: &str, destination: Q) -> Result<PathBuf>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let (file, destination) = (file.as_ref(), destination.as_ref());
        tracing::info!(
            "Writing {} at {} to {}",
            file.display(),
            id,
            destination.display()
        );

        self.with_repo(|repo| {
            let relative = normalize(workdir(repo)?, file);
            write_version(repo, &relative, id, destination)?;
            Ok(destination.to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_keeps_extension() {
        assert_eq!(artifact_name("abc123", Path::new("src/a.xpo")), "abc123.xpo");
        assert_eq!(artifact_name("abc123", Path::new("Makefile")), "abc123");
    }
}
