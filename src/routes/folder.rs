//! Folder and index endpoints.
//!
//! - POST /api/v1/folder/sync { repo, folder, force }
//!   Checks the folder out at the HEAD tip and lists its files of interest,
//!   each tagged `Update`.
//!
//! - GET /api/v1/index?repo=
//!   Lists modified, staged and untracked files with materialized copies.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::HistoryRecord;
use crate::routes::{blocking, SharedSettings};

pub fn routes(settings: SharedSettings) -> Router {
    Router::new()
        .route("/api/v1/folder/sync", post(folder_sync))
        .route("/api/v1/index", get(files_in_index))
        .with_state(settings)
}

#[derive(Debug, Deserialize)]
struct SyncRequest {
    repo: String,
    folder: String,
    #[serde(default)]
    force: bool,
}

async fn folder_sync(
    State(settings): State<SharedSettings>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<Vec<HistoryRecord>>> {
    let SyncRequest { repo, folder, force } = request;
    let records = blocking(&settings, repo, move |repo| repo.folder_sync(folder, force)).await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    repo: String,
}

async fn files_in_index(
    State(settings): State<SharedSettings>,
    Query(query): Query<IndexQuery>,
) -> Result<Json<Vec<HistoryRecord>>> {
    let records = blocking(&settings, query.repo, |repo| repo.get_files_in_index()).await?;
    Ok(Json(records))
}
