//! Application state and request extractors

use std::sync::Arc;

use ag_contracts::{FieldContract, OperationContract, ScheduleContract, WorkerContract};
use ag_core::config::AppConfig;
use ag_core::traits::Id;
use ag_db::{
    FieldRepository, OperationRepository, ReportRepository, ScheduleRepository, WorkerRepository,
};
use ag_models::{Field, FieldInput, Operation, OperationInput, Schedule, ScheduleInput, Worker, WorkerInput};
use ag_services::{EntityService, OperationService, ReportService};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};

pub type WorkerService = EntityService<Worker, WorkerInput, WorkerRepository, WorkerContract>;
pub type FieldService = EntityService<Field, FieldInput, FieldRepository, FieldContract>;
pub type ScheduleService = EntityService<Schedule, ScheduleInput, ScheduleRepository, ScheduleContract>;
pub type OperationCrudService =
    EntityService<Operation, OperationInput, OperationRepository, OperationContract>;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn workers(&self) -> WorkerService {
        EntityService::new(WorkerRepository::new(self.pool.clone()), WorkerContract::new())
    }

    pub fn fields(&self) -> FieldService {
        EntityService::new(FieldRepository::new(self.pool.clone()), FieldContract::new())
    }

    pub fn schedules(&self) -> ScheduleService {
        EntityService::new(ScheduleRepository::new(self.pool.clone()), ScheduleContract::new())
    }

    pub fn operations(&self) -> OperationCrudService {
        EntityService::new(OperationRepository::new(self.pool.clone()), OperationContract::new())
    }

    pub fn lifecycle(&self) -> OperationService<OperationRepository> {
        OperationService::new(OperationRepository::new(self.pool.clone()))
    }

    pub fn reports(&self) -> ReportService<ReportRepository> {
        ReportService::new(ReportRepository::new(self.pool.clone()))
    }
}

/// Parse a path identifier; anything but a positive integer is a 400
pub fn parse_id(raw: &str, entity: &str) -> ApiResult<Id> {
    raw.trim()
        .parse::<Id>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid {} ID", entity)))
}

/// JSON body whose rejection renders through [`ApiError`]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    ApiError::bad_request("Invalid JSON payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "worker").unwrap(), 42);
        for raw in ["0", "-1", "abc", "4.2", ""] {
            let err = parse_id(raw, "worker").unwrap_err();
            assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_parse_id_message_names_entity() {
        match parse_id("x", "operation").unwrap_err() {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Invalid operation ID"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
