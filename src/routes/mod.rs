//! API route handlers - maps HTTP endpoints to repository operations.
//!
//! Every request names the repository it works on; the server keeps no open
//! repository between requests. Each submodule defines routes for a feature
//! area:
//! - `repository`: Init, version string, root folder check
//! - `file`: History, versions, undo, existence and status of one file
//! - `folder`: Folder sync and dirty index listing

pub mod file;
pub mod folder;
pub mod repository;

use std::sync::Arc;

use axum::Router;

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::git::GitRepository;

pub type SharedSettings = Arc<Settings>;

pub fn create_router(settings: SharedSettings) -> Router {
    Router::new()
        .merge(repository::routes(settings.clone()))
        .merge(file::routes(settings.clone()))
        .merge(folder::routes(settings))
}

/// Run a repository operation on the blocking pool. libgit2 calls do file
/// I/O and can walk long histories.
pub(crate) async fn blocking<F, T>(settings: &SharedSettings, repo_path: String, f: F) -> Result<T>
where
    F: FnOnce(GitRepository) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let repo = GitRepository::with_settings(repo_path, settings);
    tokio::task::spawn_blocking(move || f(repo))
        .await
        .map_err(|e| AppError::Internal(format!("Repository task failed: {}", e)))?
}
