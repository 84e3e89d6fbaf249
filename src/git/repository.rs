use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use git2::Repository;
use std::path::{Path, PathBuf};

use crate::config::{EnumerationStrategy, Settings};
use crate::error::{AppError, Result};
use crate::models::{short_id, AuthorInfo, CommitRef};

/// A repository on disk plus the settings its operations run with.
///
/// Holds no libgit2 state. Every operation opens its own handle through
/// `with_repo` and drops it before returning, so nothing is shared or cached
/// between calls.
#[derive(Debug, Clone)]
pub struct GitRepository {
    pub path: PathBuf,
    pub(crate) artifact_dir: PathBuf,
    pub(crate) extension: String,
    pub(crate) enumeration: EnumerationStrategy,
}

impl GitRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_settings(path, &Settings::default())
    }

    pub fn with_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            artifact_dir: settings.artifact_dir(),
            extension: settings.extension().to_string(),
            enumeration: settings.enumeration,
        }
    }

    /// Create an empty repository at `path`.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Initializing repository at {}", path.display());
        Repository::init(path)?;
        Ok(Self::new(path))
    }

    /// Run `f` against a freshly opened handle, released when `f` returns.
    pub fn with_repo<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Repository) -> Result<T>,
    {
        let repo = Repository::open(&self.path).map_err(|e| {
            tracing::debug!("Cannot open {}: {}", self.path.display(), e);
            AppError::RepoNotFound(self.path.to_string_lossy().to_string())
        })?;
        f(&repo)
    }

    /// True if `path` is the repository's working directory itself.
    pub fn is_root_folder<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let path = path.as_ref();
        self.with_repo(|repo| Ok(workdir(repo)? == path))
    }
}

/// Working directory of an open repository; bare repositories have none.
pub fn workdir(repo: &Repository) -> Result<&Path> {
    repo.workdir().ok_or_else(|| {
        AppError::InvalidPath(format!(
            "{} is a bare repository",
            repo.path().display()
        ))
    })
}

/// Tool and backend versions, e.g. `gitax 0.1.0 - libgit2 1.9.0`.
pub fn version() -> String {
    let (major, minor, patch) = git2::Version::get().libgit2_version();
    format!(
        "gitax {} - libgit2 {}.{}.{}",
        env!("CARGO_PKG_VERSION"),
        major,
        minor,
        patch
    )
}

pub fn commit_to_ref(commit: &git2::Commit) -> CommitRef {
    let oid = commit.id().to_string();
    let author = commit.author();
    let when = commit.committer().when();

    let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix());
    let committed = DateTime::from_timestamp(when.seconds(), 0)
        .unwrap_or_default()
        .with_timezone(&offset);

    CommitRef {
        short_oid: short_id(&oid),
        oid,
        author: AuthorInfo {
            name: author.name().unwrap_or("Unknown").to_string(),
            email: author.email().unwrap_or("").to_string(),
        },
        message: commit.message().unwrap_or("").to_string(),
        summary: commit.summary().unwrap_or("").to_string(),
        date: committed.date_naive(),
        time: committed.time().num_seconds_from_midnight(),
        timestamp: when.seconds(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
    }
}
