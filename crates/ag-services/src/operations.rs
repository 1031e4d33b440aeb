//! Operation lifecycle service
//!
//! Start, complete and reject are checked against the status machine before
//! the store is touched. Plain CRUD on operations goes through
//! [`EntityService`](crate::base::EntityService).

use ag_contracts::base::Contract;
use ag_contracts::operations::{LifecycleAction, TransitionContract};
use ag_core::error::AgError;
use ag_core::result::AgResult;
use ag_core::traits::Id;
use ag_core::types::OperationStatus;
use ag_db::operations::{OperationFilter, OperationRepository};
use ag_db::repository::RepositoryResult;
use ag_models::Operation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage seam for the lifecycle service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperationStore: Send + Sync {
    async fn find_filtered(&self, filter: &OperationFilter) -> RepositoryResult<Vec<Operation>>;

    async fn status_of(&self, id: Id) -> RepositoryResult<Option<OperationStatus>>;

    async fn mark_started(&self, id: Id, now: DateTime<Utc>) -> RepositoryResult<Operation>;

    async fn mark_completed(&self, id: Id, now: DateTime<Utc>) -> RepositoryResult<Operation>;

    async fn reset(&self, id: Id) -> RepositoryResult<Operation>;
}

#[async_trait]
impl OperationStore for OperationRepository {
    async fn find_filtered(&self, filter: &OperationFilter) -> RepositoryResult<Vec<Operation>> {
        OperationRepository::find_filtered(self, filter).await
    }

    async fn status_of(&self, id: Id) -> RepositoryResult<Option<OperationStatus>> {
        OperationRepository::status_of(self, id).await
    }

    async fn mark_started(&self, id: Id, now: DateTime<Utc>) -> RepositoryResult<Operation> {
        OperationRepository::mark_started(self, id, now).await
    }

    async fn mark_completed(&self, id: Id, now: DateTime<Utc>) -> RepositoryResult<Operation> {
        OperationRepository::mark_completed(self, id, now).await
    }

    async fn reset(&self, id: Id) -> RepositoryResult<Operation> {
        OperationRepository::reset(self, id).await
    }
}

pub struct OperationService<S> {
    store: S,
}

impl<S: OperationStore> OperationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &OperationFilter) -> AgResult<Vec<Operation>> {
        Ok(self.store.find_filtered(filter).await?)
    }

    pub async fn start(&self, id: Id, now: DateTime<Utc>) -> AgResult<Operation> {
        self.check(id, LifecycleAction::Start).await?;
        let operation = self.store.mark_started(id, now).await?;
        tracing::info!(id, status = %operation.status, "Operation started");
        Ok(operation)
    }

    pub async fn complete(&self, id: Id, now: DateTime<Utc>) -> AgResult<Operation> {
        self.check(id, LifecycleAction::Complete).await?;
        let operation = self.store.mark_completed(id, now).await?;
        tracing::info!(id, status = %operation.status, "Operation completed");
        Ok(operation)
    }

    /// Reset to `planned`, dropping the worker and schedule assignment
    pub async fn reject(&self, id: Id) -> AgResult<Operation> {
        self.check(id, LifecycleAction::Reject).await?;
        let operation = self.store.reset(id).await?;
        tracing::info!(id, "Operation rejected");
        Ok(operation)
    }

    async fn check(&self, id: Id, action: LifecycleAction) -> AgResult<OperationStatus> {
        let current = self
            .store
            .status_of(id)
            .await?
            .ok_or_else(|| AgError::not_found("Operation", id))?;

        TransitionContract::new(action).validate(&current)?;
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockall::predicate::eq;

    fn operation(id: Id, status: OperationStatus) -> Operation {
        let now = Utc::now();
        Operation {
            id,
            schedule_id: None,
            worker_id: Some(1),
            field_id: 2,
            operation_type: "plowing".into(),
            description: None,
            status,
            start_time: None,
            end_time: None,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
            worker: None,
            field: None,
        }
    }

    #[tokio::test]
    async fn test_start_from_planned() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut store = MockOperationStore::new();
        store
            .expect_status_of()
            .with(eq(5))
            .returning(|_| Ok(Some(OperationStatus::Planned)));
        store
            .expect_mark_started()
            .with(eq(5), eq(now))
            .times(1)
            .returning(|id, now| {
                let mut op = operation(id, OperationStatus::InProgress);
                op.start_time = Some(now);
                Ok(op)
            });

        let op = OperationService::new(store).start(5, now).await.unwrap();
        assert_eq!(op.status, OperationStatus::InProgress);
        assert_eq!(op.start_time, Some(now));
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let mut store = MockOperationStore::new();
        store
            .expect_status_of()
            .returning(|_| Ok(Some(OperationStatus::InProgress)));
        store.expect_mark_started().never();

        let err = OperationService::new(store)
            .start(5, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_complete_cancelled_is_rejected() {
        let mut store = MockOperationStore::new();
        store
            .expect_status_of()
            .returning(|_| Ok(Some(OperationStatus::Cancelled)));
        store.expect_mark_completed().never();

        let err = OperationService::new(store)
            .complete(5, Utc::now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot complete an operation that is cancelled"));
    }

    #[tokio::test]
    async fn test_complete_never_started_stays_valid() {
        use ag_contracts::operations::OperationContract;
        use ag_models::OperationInput;

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap();
        let mut store = MockOperationStore::new();
        store
            .expect_status_of()
            .returning(|_| Ok(Some(OperationStatus::Planned)));
        store
            .expect_mark_completed()
            .with(eq(6), eq(now))
            .times(1)
            .returning(|id, now| {
                let mut op = operation(id, OperationStatus::Completed);
                op.start_time = Some(now);
                op.end_time = Some(now);
                op.completed_at = Some(now);
                Ok(op)
            });

        let op = OperationService::new(store).complete(6, now).await.unwrap();
        assert_eq!(op.start_time, op.end_time);

        // The stored row must survive being PUT back unchanged.
        let round_trip = OperationInput {
            schedule_id: op.schedule_id,
            worker_id: op.worker_id.unwrap_or_default(),
            field_id: op.field_id,
            operation_type: op.operation_type.clone(),
            description: op.description.clone(),
            status: Some(op.status),
            start_time: op.start_time,
            end_time: op.end_time,
            notes: op.notes.clone(),
        };
        assert!(OperationContract::new().validate(&round_trip).is_ok());
    }

    #[tokio::test]
    async fn test_reject_completed_resets() {
        let mut store = MockOperationStore::new();
        store
            .expect_status_of()
            .returning(|_| Ok(Some(OperationStatus::Completed)));
        store.expect_reset().with(eq(9)).times(1).returning(|id| {
            let mut op = operation(id, OperationStatus::Planned);
            op.worker_id = None;
            Ok(op)
        });

        let op = OperationService::new(store).reject(9).await.unwrap();
        assert_eq!(op.status, OperationStatus::Planned);
        assert!(op.worker_id.is_none());
    }

    #[tokio::test]
    async fn test_missing_operation_is_not_found() {
        let mut store = MockOperationStore::new();
        store.expect_status_of().returning(|_| Ok(None));

        let err = OperationService::new(store).reject(404).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
