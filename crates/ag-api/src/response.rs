//! Success envelope: `{"message": "...", "data": ...}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Envelope<T> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// JSON success response
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(data))
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(data))
    }

    fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            body: Envelope {
                message: message.into(),
                data,
            },
        }
    }
}

impl ApiResponse<()> {
    /// Response without `data`, for deletes and lifecycle actions
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_only_omits_data() {
        let response = ApiResponse::message("Worker deleted successfully");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&response.body).unwrap(),
            json!({"message": "Worker deleted successfully"})
        );
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created("Field created successfully", json!({"id": 1}));
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(serde_json::to_value(&response.body).unwrap()["data"]["id"], 1);
    }
}
