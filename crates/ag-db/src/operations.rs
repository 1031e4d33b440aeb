//! Operation repository
//!
//! Reads join the worker and the field so responses can embed their names.
//! Status lives in a VARCHAR column and is parsed on the way out.

use async_trait::async_trait;
use ag_core::traits::{Entity, Id};
use ag_core::types::{OperationStatus, ReportWindow};
use ag_models::{FieldSummary, Operation, OperationInput, WorkerSummary};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

const SELECT: &str = r#"
    SELECT o.id, o.schedule_id, o.worker_id, o.field_id, o.type AS operation_type,
           o.description, o.status, o.start_time, o.end_time, o.completed_at,
           o.notes, o.created_at, o.updated_at,
           w.name AS worker_name, f.name AS field_name
    FROM operations o
    LEFT JOIN workers w ON w.id = o.worker_id
    LEFT JOIN fields f ON f.id = o.field_id
"#;

const ORDER: &str = "ORDER BY o.start_time DESC NULLS LAST, o.id DESC";

/// A never-started operation completes with a zero-length interval at `$2`
const MARK_COMPLETED: &str = r#"
    UPDATE operations SET
        status = 'completed',
        completed_at = $2,
        start_time = COALESCE(start_time, $2),
        end_time = COALESCE(end_time, $2),
        updated_at = NOW()
    WHERE id = $1
"#;

/// Operation database entity, joined with worker and field names
#[derive(Debug, Clone, FromRow)]
pub struct OperationRow {
    pub id: i64,
    pub schedule_id: Option<i64>,
    pub worker_id: Option<i64>,
    pub field_id: i64,
    pub operation_type: String,
    pub description: Option<String>,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub worker_name: Option<String>,
    pub field_name: Option<String>,
}

impl TryFrom<OperationRow> for Operation {
    type Error = RepositoryError;

    fn try_from(row: OperationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OperationStatus>()
            .map_err(|e| RepositoryError::Decode(format!("operation {}: {}", row.id, e)))?;

        let worker = match (row.worker_id, row.worker_name) {
            (Some(id), Some(name)) => Some(WorkerSummary { id, name }),
            _ => None,
        };
        let field = row.field_name.map(|name| FieldSummary {
            id: row.field_id,
            name,
        });

        Ok(Operation {
            id: row.id,
            schedule_id: row.schedule_id,
            worker_id: row.worker_id,
            field_id: row.field_id,
            operation_type: row.operation_type,
            description: row.description,
            status,
            start_time: row.start_time,
            end_time: row.end_time,
            completed_at: row.completed_at,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            worker,
            field,
        })
    }
}

fn into_operations(rows: Vec<OperationRow>) -> RepositoryResult<Vec<Operation>> {
    rows.into_iter().map(Operation::try_from).collect()
}

/// Query-string filters on the operation list; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationFilter {
    pub status: Option<OperationStatus>,
    pub worker_id: Option<Id>,
    pub field_id: Option<Id>,
    /// UTC calendar date the start time falls on
    pub date: Option<NaiveDate>,
}

impl OperationFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Operation repository implementation
#[derive(Clone)]
pub struct OperationRepository {
    pool: PgPool,
}

impl OperationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List operations matching every set filter
    pub async fn find_filtered(&self, filter: &OperationFilter) -> RepositoryResult<Vec<Operation>> {
        let (from, to) = match filter.date {
            Some(date) => {
                let (from, to) = ReportWindow::day(date).bounds();
                (Some(from), Some(to))
            }
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, OperationRow>(&format!(
            r#"
            {SELECT}
            WHERE ($1::varchar IS NULL OR o.status = $1)
              AND ($2::bigint IS NULL OR o.worker_id = $2)
              AND ($3::bigint IS NULL OR o.field_id = $3)
              AND ($4::timestamptz IS NULL OR (o.start_time >= $4 AND o.start_time < $5))
            {ORDER}
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.worker_id)
        .bind(filter.field_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        into_operations(rows)
    }

    /// Current status, or `None` when the operation does not exist
    pub async fn status_of(&self, id: Id) -> RepositoryResult<Option<OperationStatus>> {
        let status = sqlx::query_scalar::<_, String>("SELECT status FROM operations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        status
            .map(|s| {
                s.parse::<OperationStatus>()
                    .map_err(|e| RepositoryError::Decode(format!("operation {}: {}", id, e)))
            })
            .transpose()
    }

    /// Move to `in_progress`, stamping the start time
    pub async fn mark_started(&self, id: Id, now: DateTime<Utc>) -> RepositoryResult<Operation> {
        self.execute_transition(
            id,
            r#"
            UPDATE operations SET
                status = 'in_progress',
                start_time = $2,
                end_time = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
            Some(now),
        )
        .await
    }

    /// Move to `completed`; an open operation is closed at `now`
    pub async fn mark_completed(&self, id: Id, now: DateTime<Utc>) -> RepositoryResult<Operation> {
        self.execute_transition(id, MARK_COMPLETED, Some(now)).await
    }

    /// Back to `planned` with assignment and timing cleared
    pub async fn reset(&self, id: Id) -> RepositoryResult<Operation> {
        self.execute_transition(
            id,
            r#"
            UPDATE operations SET
                status = 'planned',
                worker_id = NULL,
                schedule_id = NULL,
                start_time = NULL,
                end_time = NULL,
                completed_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
            None,
        )
        .await
    }

    async fn execute_transition(
        &self,
        id: Id,
        sql: &str,
        now: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Operation> {
        let mut query = sqlx::query(sql).bind(id);
        if let Some(now) = now {
            query = query.bind(now);
        }
        let result = query.execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Operation::TYPE_NAME, id));
        }

        self.fetch_written(id).await
    }

    async fn fetch_written(&self, id: Id) -> RepositoryResult<Operation> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(Operation::TYPE_NAME, id))
    }
}

#[async_trait]
impl Repository<Operation, OperationInput> for OperationRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Operation>> {
        let row = sqlx::query_as::<_, OperationRow>(&format!("{SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Operation::try_from).transpose()
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Operation>> {
        let rows = sqlx::query_as::<_, OperationRow>(&format!("{SELECT} {ORDER}"))
            .fetch_all(&self.pool)
            .await?;

        into_operations(rows)
    }

    async fn create(&self, input: OperationInput) -> RepositoryResult<Operation> {
        let status = input.status_or_default();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO operations (
                schedule_id, worker_id, field_id, type, description, status,
                start_time, end_time, completed_at, notes, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8,
                CASE WHEN $6 = 'completed' THEN NOW() END,
                $9, NOW(), NOW()
            )
            RETURNING id
            "#,
        )
        .bind(input.schedule_id)
        .bind(input.worker_id)
        .bind(input.field_id)
        .bind(&input.operation_type)
        .bind(&input.description)
        .bind(status.as_str())
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        self.fetch_written(id).await
    }

    async fn update(&self, id: Id, input: OperationInput) -> RepositoryResult<Operation> {
        let status = input.status_or_default();
        let result = sqlx::query(
            r#"
            UPDATE operations SET
                schedule_id = $1,
                worker_id = $2,
                field_id = $3,
                type = $4,
                description = $5,
                status = $6,
                start_time = $7,
                end_time = $8,
                completed_at = CASE WHEN $6 = 'completed' THEN COALESCE(completed_at, NOW()) END,
                notes = $9,
                updated_at = NOW()
            WHERE id = $10
            "#,
        )
        .bind(input.schedule_id)
        .bind(input.worker_id)
        .bind(input.field_id)
        .bind(&input.operation_type)
        .bind(&input.description)
        .bind(status.as_str())
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(&input.notes)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Operation::TYPE_NAME, id));
        }

        self.fetch_written(id).await
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM operations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Operation::TYPE_NAME, id));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM operations WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> OperationRow {
        let now = Utc::now();
        OperationRow {
            id: 11,
            schedule_id: None,
            worker_id: Some(1),
            field_id: 2,
            operation_type: "seeding".into(),
            description: None,
            status: status.into(),
            start_time: Some(now),
            end_time: None,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
            worker_name: Some("Mehmet".into()),
            field_name: Some("North plot".into()),
        }
    }

    #[test]
    fn test_row_into_operation() {
        let op = Operation::try_from(row("in_progress")).unwrap();
        assert_eq!(op.status, OperationStatus::InProgress);
        assert_eq!(op.worker.unwrap().name, "Mehmet");
        assert_eq!(op.field.unwrap().id, 2);
    }

    #[test]
    fn test_rejected_operation_has_no_worker_summary() {
        let mut row = row("planned");
        row.worker_id = None;
        row.worker_name = None;
        let op = Operation::try_from(row).unwrap();
        assert!(op.worker.is_none());
        assert!(op.field.is_some());
    }

    #[test]
    fn test_unknown_status_is_decode_error() {
        let err = Operation::try_from(row("done")).unwrap_err();
        assert!(matches!(err, RepositoryError::Decode(_)));
    }

    #[test]
    fn test_completion_fills_missing_start_time() {
        assert!(MARK_COMPLETED.contains("start_time = COALESCE(start_time, $2)"));
        assert!(MARK_COMPLETED.contains("end_time = COALESCE(end_time, $2)"));
    }

    #[test]
    fn test_filter_empty() {
        assert!(OperationFilter::default().is_empty());
        let filter = OperationFilter {
            worker_id: Some(1),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
