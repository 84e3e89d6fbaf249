//! Folder synchronisation to the HEAD tip and dirty-file enumeration.

use git2::{Commit, Repository, Status, StatusOptions, StatusShow};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::EnumerationStrategy;
use crate::error::Result;
use crate::git::materialize::{artifact_name, checkout_folder, write_version};
use crate::git::path::{normalize, repo_path_string};
use crate::git::repository::{workdir, GitRepository};
use crate::git::status::file_status;
use crate::git::tree::{has_extension, subtree, walk};
use crate::models::{EntryKind, FileDescriptor, FileStatus, HistoryRecord, RecordAction};

/// Finds the files of interest under a folder after it was checked out.
pub trait FileEnumerator {
    /// Files below `folder` (repository-relative) whose extension is
    /// `extension`, as of `tip`.
    fn enumerate(
        &self,
        repo: &Repository,
        tip: &Commit,
        folder: &Path,
        extension: &str,
    ) -> Result<Vec<FileDescriptor>>;
}

/// Reads the tip commit's tree, so the result is exactly what was checked
/// out regardless of stray files on disk.
pub struct TreeEnumerator;

impl FileEnumerator for TreeEnumerator {
    fn enumerate(
        &self,
        repo: &Repository,
        tip: &Commit,
        folder: &Path,
        extension: &str,
    ) -> Result<Vec<FileDescriptor>> {
        let prefix = repo_path_string(folder);
        let tree = subtree(repo, tip.tree()?, &prefix)?;
        walk(repo, tree, &prefix, true, has_extension(extension)).collect()
    }
}

/// Scans the working directory. Untracked files that happen to match are
/// reported too.
pub struct WorkdirEnumerator;

impl FileEnumerator for WorkdirEnumerator {
    fn enumerate(
        &self,
        repo: &Repository,
        _tip: &Commit,
        folder: &Path,
        extension: &str,
    ) -> Result<Vec<FileDescriptor>> {
        let root = workdir(repo)?;
        let matches = has_extension(extension);
        let mut files = Vec::new();

        let walker = WalkDir::new(root.join(folder))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let descriptor = FileDescriptor {
                path: repo_path_string(&normalize(root, entry.path())),
                name: entry.file_name().to_string_lossy().to_string(),
                oid: None,
                kind: EntryKind::File,
            };
            if matches(&descriptor) {
                files.push(descriptor);
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

impl EnumerationStrategy {
    pub fn enumerator(self) -> Box<dyn FileEnumerator> {
        match self {
            EnumerationStrategy::Tree => Box::new(TreeEnumerator),
            EnumerationStrategy::Workdir => Box::new(WorkdirEnumerator),
        }
    }
}

impl GitRepository {
    /// Check `folder` out at the HEAD tip and report its files of interest,
    /// using the configured enumeration strategy.
    pub fn folder_sync<P: AsRef<Path>>(&self, folder: P, force: bool) -> Result<Vec<HistoryRecord>> {
        let enumerator = self.enumeration.enumerator();
        self.folder_sync_with(folder, force, enumerator.as_ref())
    }

    pub fn folder_sync_with<P: AsRef<Path>>(
        &self,
        folder: P,
        force: bool,
        enumerator: &dyn FileEnumerator,
    ) -> Result<Vec<HistoryRecord>> {
        let folder = folder.as_ref();
        tracing::info!("Syncing {} in {} (force: {})", folder.display(), self.path.display(), force);

        self.with_repo(|repo| {
            let root = workdir(repo)?;
            let relative = normalize(root, folder);

            let tip = repo.head()?.peel_to_commit()?;
            let tip_id = tip.id().to_string();
            checkout_folder(repo, &relative, &tip_id, force)?;

            let files = enumerator.enumerate(repo, &tip, &relative, &self.extension)?;
            tracing::info!("{} .{} files under {} at {}", files.len(), self.extension, relative.display(), tip_id);

            let records = files
                .into_iter()
                .map(|file| {
                    let absolute = root.join(&file.path);
                    let status = file_status(repo, Path::new(&file.path));
                    HistoryRecord::new(file.path, absolute.clone())
                        .with_oid(&tip_id)
                        .with_status(status)
                        .with_artifact(absolute)
                        .with_action(RecordAction::Update)
                })
                .collect();

            Ok(records)
        })
    }

    /// Every file with staged or unstaged changes, each copied to the
    /// artifact directory: staged content for files in the index, the file
    /// itself for untracked ones.
    pub fn get_files_in_index(&self) -> Result<Vec<HistoryRecord>> {
        tracing::info!("Collecting dirty files in {}", self.path.display());

        self.with_repo(|repo| {
            let root = workdir(repo)?;

            let mut opts = StatusOptions::new();
            opts.show(StatusShow::IndexAndWorkdir)
                .include_untracked(true)
                .recurse_untracked_dirs(true)
                .include_ignored(false);

            let statuses = repo.statuses(Some(&mut opts))?;
            let dirty: Vec<(String, Status)> = statuses
                .iter()
                .filter(|entry| entry.status() != Status::CURRENT && !entry.status().is_ignored())
                .filter_map(|entry| entry.path().map(|p| (p.to_string(), entry.status())))
                .collect();

            if dirty.is_empty() {
                return Ok(Vec::new());
            }

            fs::create_dir_all(&self.artifact_dir)?;
            let index = repo.index()?;
            let mut records = Vec::with_capacity(dirty.len());

            for (path, status) in dirty {
                let relative = PathBuf::from(&path);
                let absolute = root.join(&relative);
                let record = HistoryRecord::new(path, absolute.clone())
                    .with_status(FileStatus::from(status));

                let record = match index.get_path(&relative, 0) {
                    Some(entry) => {
                        let oid = entry.id.to_string();
                        let destination = self.artifact_dir.join(artifact_name(&oid, &relative));
                        write_version(repo, &relative, &oid, &destination)?;
                        record.with_oid(&oid).with_artifact(destination)
                    }
                    // Not in the index: untracked, copy what is on disk
                    None if absolute.is_file() => {
                        let name = relative.file_name().unwrap_or(relative.as_os_str());
                        let destination = self.artifact_dir.join(name);
                        fs::copy(&absolute, &destination)?;
                        record.with_artifact(destination)
                    }
                    None => {
                        tracing::debug!("{} is gone from index and disk", relative.display());
                        record
                    }
                };
                records.push(record);
            }

            Ok(records)
        })
    }
}
