//! Report source query
//!
//! Reports are aggregated in memory; this module only fetches the operation
//! rows whose start time falls inside a window, in a single statement.

use ag_core::types::ReportWindow;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repository::RepositoryResult;

/// One operation as seen by the report aggregator
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ReportOperationRow {
    pub operation_id: i64,
    pub worker_id: Option<i64>,
    pub worker_name: Option<String>,
    pub field_id: i64,
    pub field_name: Option<String>,
    pub operation_type: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Operations started inside `window`, in start order
    pub async fn operations_in(&self, window: &ReportWindow) -> RepositoryResult<Vec<ReportOperationRow>> {
        let (from, to) = window.bounds();

        let rows = sqlx::query_as::<_, ReportOperationRow>(
            r#"
            SELECT o.id AS operation_id,
                   o.worker_id, w.name AS worker_name,
                   o.field_id, f.name AS field_name,
                   o.type AS operation_type, o.status,
                   o.start_time, o.end_time
            FROM operations o
            LEFT JOIN workers w ON w.id = o.worker_id
            LEFT JOIN fields f ON f.id = o.field_id
            WHERE o.start_time >= $1 AND o.start_time < $2
            ORDER BY o.start_time ASC, o.id ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(
            from = %window.from,
            to = %window.to,
            rows = rows.len(),
            "Fetched report source rows"
        );

        Ok(rows)
    }
}
