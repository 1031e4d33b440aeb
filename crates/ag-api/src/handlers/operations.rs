//! Operation API handlers

use ag_core::types::OperationStatus;
use ag_db::OperationFilter;
use ag_models::OperationInput;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{parse_id, AppState, JsonBody};
use crate::response::ApiResponse;

/// Raw list filters; parsed by hand so bad values become 400s
#[derive(Debug, Default, Deserialize)]
pub struct OperationQuery {
    pub status: Option<String>,
    pub worker_id: Option<String>,
    pub field_id: Option<String>,
    pub date: Option<String>,
}

impl OperationQuery {
    pub fn into_filter(self) -> ApiResult<OperationFilter> {
        let present = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let status = present(self.status)
            .map(|s| {
                s.parse::<OperationStatus>()
                    .map_err(|e| ApiError::bad_request(e.to_string()))
            })
            .transpose()?;
        let worker_id = present(self.worker_id)
            .map(|s| parse_id(&s, "worker"))
            .transpose()?;
        let field_id = present(self.field_id)
            .map(|s| parse_id(&s, "field"))
            .transpose()?;
        let date = present(self.date)
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|_| ApiError::bad_request("Invalid date format. Use YYYY-MM-DD"))
            })
            .transpose()?;

        Ok(OperationFilter {
            status,
            worker_id,
            field_id,
            date,
        })
    }
}

/// POST /operations
pub async fn create_operation(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<OperationInput>,
) -> ApiResult<impl IntoResponse> {
    let operation = state.operations().create(input).await?;
    Ok(ApiResponse::created("Operation created successfully", operation))
}

/// GET /operations?status=&worker_id=&field_id=&date=
pub async fn list_operations(
    State(state): State<AppState>,
    Query(query): Query<OperationQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let operations = state.lifecycle().list(&filter).await?;
    Ok(ApiResponse::ok("Operations retrieved successfully", operations))
}

/// GET /operations/:id
pub async fn get_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "operation")?;
    let operation = state.operations().get(id).await?;
    Ok(ApiResponse::ok("Operation retrieved successfully", operation))
}

/// PUT /operations/:id
pub async fn update_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<OperationInput>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "operation")?;
    let operation = state.operations().update(id, input).await?;
    Ok(ApiResponse::ok("Operation updated successfully", operation))
}

/// DELETE /operations/:id
pub async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "operation")?;
    state.operations().delete(id).await?;
    Ok(ApiResponse::message("Operation deleted successfully"))
}

/// POST /operations/:id/start
pub async fn start_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "operation")?;
    state.lifecycle().start(id, Utc::now()).await?;
    Ok(ApiResponse::message("Operation started successfully"))
}

/// POST /operations/:id/complete
pub async fn complete_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "operation")?;
    state.lifecycle().complete(id, Utc::now()).await?;
    Ok(ApiResponse::message("Operation completed successfully"))
}

/// POST /operations/:id/reject
pub async fn reject_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "operation")?;
    state.lifecycle().reject(id).await?;
    Ok(ApiResponse::message("Operation rejected successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        let filter = OperationQuery::default().into_filter().unwrap();
        assert!(filter.is_empty());

        let filter = OperationQuery {
            status: Some(" ".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_query_parsed() {
        let filter = OperationQuery {
            status: Some("in_progress".into()),
            worker_id: Some("3".into()),
            field_id: None,
            date: Some("2024-05-01".into()),
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.status, Some(OperationStatus::InProgress));
        assert_eq!(filter.worker_id, Some(3));
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_bad_query_values() {
        for query in [
            OperationQuery { status: Some("done".into()), ..Default::default() },
            OperationQuery { worker_id: Some("abc".into()), ..Default::default() },
            OperationQuery { date: Some("01-05-2024".into()), ..Default::default() },
        ] {
            assert!(query.into_filter().is_err());
        }
    }
}
