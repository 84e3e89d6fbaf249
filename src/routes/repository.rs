//! Repository-level endpoints.
//!
//! - POST /api/v1/repository/init { repo }
//! - GET /api/v1/version
//! - GET /api/v1/repository/is-root?repo=&path=

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::git::{version, GitRepository};
use crate::routes::{blocking, SharedSettings};

pub fn routes(settings: SharedSettings) -> Router {
    Router::new()
        .route("/api/v1/repository/init", post(init_repository))
        .route("/api/v1/repository/is-root", get(is_root_folder))
        .route("/api/v1/version", get(get_version))
        .with_state(settings)
}

#[derive(Debug, Deserialize)]
struct InitRequest {
    repo: String,
}

#[derive(Debug, Serialize)]
struct InitResponse {
    path: String,
}

async fn init_repository(Json(request): Json<InitRequest>) -> Result<Json<InitResponse>> {
    let path = request.repo;
    let repo = tokio::task::spawn_blocking(move || GitRepository::init(path))
        .await
        .map_err(|e| AppError::Internal(format!("Repository task failed: {}", e)))??;

    Ok(Json(InitResponse {
        path: repo.path.to_string_lossy().to_string(),
    }))
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    version: String,
}

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse { version: version() })
}

#[derive(Debug, Deserialize)]
struct IsRootQuery {
    repo: String,
    path: String,
}

#[derive(Debug, Serialize)]
struct IsRootResponse {
    is_root: bool,
}

async fn is_root_folder(
    State(settings): State<SharedSettings>,
    Query(query): Query<IsRootQuery>,
) -> Result<Json<IsRootResponse>> {
    let path = query.path;
    let is_root = blocking(&settings, query.repo, move |repo| repo.is_root_folder(path)).await?;
    Ok(Json(IsRootResponse { is_root }))
}
