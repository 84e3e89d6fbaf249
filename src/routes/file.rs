//! Single-file endpoints.
//!
//! - GET /api/v1/file/history?repo=&path=
//!   Commits that changed the file, each version materialized to disk.
//!
//! - POST /api/v1/file/version { repo, path, id, destination? }
//!   Without `destination`: forced checkout of the file at commit `id`.
//!   With `destination`: writes the commit or blob `id` to that file.
//!
//! - POST /api/v1/file/undo { repo, path, force }
//!   Restores the file to its latest committed version.
//!
//! - GET /api/v1/file/exists?repo=&path=
//! - GET /api/v1/file/status?repo=&path=

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{FileStatus, HistoryRecord};
use crate::routes::{blocking, SharedSettings};

pub fn routes(settings: SharedSettings) -> Router {
    Router::new()
        .route("/api/v1/file/history", get(get_history))
        .route("/api/v1/file/version", post(get_version))
        .route("/api/v1/file/undo", post(undo_checkout))
        .route("/api/v1/file/exists", get(file_exists))
        .route("/api/v1/file/status", get(file_status))
        .with_state(settings)
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    repo: String,
    path: String,
}

async fn get_history(
    State(settings): State<SharedSettings>,
    Query(query): Query<FileQuery>,
) -> Result<Json<Vec<HistoryRecord>>> {
    let path = query.path;
    let records = blocking(&settings, query.repo, move |repo| repo.file_history(path)).await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
struct VersionRequest {
    repo: String,
    path: String,
    id: String,
    destination: Option<String>,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    path: String,
}

async fn get_version(
    State(settings): State<SharedSettings>,
    Json(request): Json<VersionRequest>,
) -> Result<Json<VersionResponse>> {
    let VersionRequest {
        repo,
        path,
        id,
        destination,
    } = request;

    let written = blocking(&settings, repo, move |repo| match destination {
        Some(destination) => repo.file_get_version_to(path, &id, destination),
        None => repo.file_get_version(path, &id),
    })
    .await?;

    Ok(Json(VersionResponse {
        path: written.to_string_lossy().to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct UndoRequest {
    repo: String,
    path: String,
    #[serde(default)]
    force: bool,
}

#[derive(Debug, Serialize)]
struct UndoResponse {
    success: bool,
}

async fn undo_checkout(
    State(settings): State<SharedSettings>,
    Json(request): Json<UndoRequest>,
) -> Result<Json<UndoResponse>> {
    let UndoRequest { repo, path, force } = request;
    let success = blocking(&settings, repo, move |repo| repo.file_undo_checkout(path, force)).await?;
    Ok(Json(UndoResponse { success }))
}

#[derive(Debug, Serialize)]
struct ExistsResponse {
    exists: bool,
}

async fn file_exists(
    State(settings): State<SharedSettings>,
    Query(query): Query<FileQuery>,
) -> Result<Json<ExistsResponse>> {
    let path = query.path;
    let exists = blocking(&settings, query.repo, move |repo| repo.file_exists(path)).await?;
    Ok(Json(ExistsResponse { exists }))
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: FileStatus,
}

async fn file_status(
    State(settings): State<SharedSettings>,
    Query(query): Query<FileQuery>,
) -> Result<Json<StatusResponse>> {
    let path = query.path;
    let status = blocking(&settings, query.repo, move |repo| repo.get_file_status(path)).await?;
    Ok(Json(StatusResponse { status }))
}
