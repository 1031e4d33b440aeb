//! API error handling
//!
//! Every failure is rendered as `{"error": "<code>", "message": "..."}`;
//! validation failures also carry the per-field messages under `details`.

use std::collections::BTreeMap;

use ag_core::error::{AgError, ValidationErrors};
use ag_db::repository::RepositoryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message sent for every 500; the cause is only logged
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Validation(ValidationErrors),
    /// Malformed request: bad id, date, query value or JSON body
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<AgError> for ApiError {
    fn from(err: AgError) -> Self {
        match err {
            AgError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            AgError::Validation(errors) => ApiError::Validation(errors),
            AgError::Conflict { message } => ApiError::Conflict(message),
            AgError::Database(_) | AgError::Internal(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        AgError::from(err).into()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.code();
        let body = match self {
            ApiError::Validation(errors) => ErrorBody {
                error,
                message: errors.full_messages().join(", "),
                details: (!errors.errors.is_empty()).then(|| errors.errors),
            },
            ApiError::NotFound(message)
            | ApiError::BadRequest(message)
            | ApiError::Conflict(message)
            | ApiError::Internal(message) => ErrorBody {
                error,
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AgError::not_found("Field", 3), StatusCode::NOT_FOUND, "not_found"),
            (AgError::invalid("bad"), StatusCode::BAD_REQUEST, "validation_error"),
            (
                AgError::Conflict { message: "dup".into() },
                StatusCode::CONFLICT,
                "conflict",
            ),
            (
                AgError::Database("pool timed out".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let api: ApiError = AgError::Database("password authentication failed for user \"agroport\"".into()).into();
        match api {
            ApiError::Internal(msg) => assert_eq!(msg, INTERNAL_ERROR_MESSAGE),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_not_found_message() {
        let api: ApiError = RepositoryError::not_found("Operation", 12).into();
        match api {
            ApiError::NotFound(msg) => assert_eq!(msg, "Operation with id 12 not found"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
