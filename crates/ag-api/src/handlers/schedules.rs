//! Schedule API handlers

use ag_models::ScheduleInput;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::error::ApiResult;
use crate::extractors::{parse_id, AppState, JsonBody};
use crate::response::ApiResponse;

/// POST /schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ScheduleInput>,
) -> ApiResult<impl IntoResponse> {
    let schedule = state.schedules().create(input).await?;
    Ok(ApiResponse::created("Schedule created successfully", schedule))
}

/// GET /schedules
pub async fn list_schedules(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let schedules = state.schedules().list().await?;
    Ok(ApiResponse::ok("Schedules retrieved successfully", schedules))
}

/// GET /schedules/:id
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "schedule")?;
    let schedule = state.schedules().get(id).await?;
    Ok(ApiResponse::ok("Schedule retrieved successfully", schedule))
}

/// PUT /schedules/:id
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ScheduleInput>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "schedule")?;
    let schedule = state.schedules().update(id, input).await?;
    Ok(ApiResponse::ok("Schedule updated successfully", schedule))
}

/// DELETE /schedules/:id
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "schedule")?;
    state.schedules().delete(id).await?;
    Ok(ApiResponse::message("Schedule deleted successfully"))
}
