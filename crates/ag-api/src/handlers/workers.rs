//! Worker API handlers

use ag_db::repository::Repository;
use ag_models::WorkerInput;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{parse_id, AppState, JsonBody};
use crate::response::ApiResponse;

/// POST /workers
pub async fn create_worker(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<WorkerInput>,
) -> ApiResult<impl IntoResponse> {
    let worker = state.workers().create(input).await?;
    Ok(ApiResponse::created("Worker created successfully", worker))
}

/// GET /workers
pub async fn list_workers(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let workers = state.workers().list().await?;
    Ok(ApiResponse::ok("Workers retrieved successfully", workers))
}

/// GET /workers/:id
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "worker")?;
    let worker = state.workers().get(id).await?;
    Ok(ApiResponse::ok("Worker retrieved successfully", worker))
}

/// PUT /workers/:id
pub async fn update_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<WorkerInput>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "worker")?;
    let worker = state.workers().update(id, input).await?;
    Ok(ApiResponse::ok("Worker updated successfully", worker))
}

/// DELETE /workers/:id
pub async fn delete_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "worker")?;
    state.workers().delete(id).await?;
    Ok(ApiResponse::message("Worker deleted successfully"))
}

/// GET /workers/:id/schedules
pub async fn list_worker_schedules(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "worker")?;

    let workers = state.workers();
    if !workers.repository().exists(id).await? {
        return Err(ApiError::not_found(format!("Worker with id {} not found", id)));
    }

    let schedules = state.schedules().repository().find_by_worker(id).await?;
    Ok(ApiResponse::ok("Worker schedules retrieved successfully", schedules))
}
