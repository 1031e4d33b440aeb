//! Field API handlers

use ag_models::FieldInput;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::error::ApiResult;
use crate::extractors::{parse_id, AppState, JsonBody};
use crate::response::ApiResponse;

/// POST /fields
pub async fn create_field(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<FieldInput>,
) -> ApiResult<impl IntoResponse> {
    let field = state.fields().create(input).await?;
    Ok(ApiResponse::created("Field created successfully", field))
}

/// GET /fields
pub async fn list_fields(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let fields = state.fields().list().await?;
    Ok(ApiResponse::ok("Fields retrieved successfully", fields))
}

/// GET /fields/:id
pub async fn get_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "field")?;
    let field = state.fields().get(id).await?;
    Ok(ApiResponse::ok("Field retrieved successfully", field))
}

/// PUT /fields/:id
pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<FieldInput>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "field")?;
    let field = state.fields().update(id, input).await?;
    Ok(ApiResponse::ok("Field updated successfully", field))
}

/// DELETE /fields/:id
pub async fn delete_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "field")?;
    state.fields().delete(id).await?;
    Ok(ApiResponse::message("Field deleted successfully"))
}
