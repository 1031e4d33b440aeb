//! Schedule repository
//!
//! Reads join the worker so responses can embed `{id, name}`.

use async_trait::async_trait;
use ag_core::traits::{Entity, Id};
use ag_models::{Schedule, ScheduleInput, WorkerSummary};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

const SELECT: &str = r#"
    SELECT s.id, s.worker_id, s.date, s.created_at, s.updated_at,
           w.name AS worker_name
    FROM schedules s
    LEFT JOIN workers w ON w.id = s.worker_id
"#;

/// Schedule database entity, joined with the worker name
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleRow {
    pub id: i64,
    pub worker_id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub worker_name: Option<String>,
}

impl From<ScheduleRow> for Schedule {
    fn from(row: ScheduleRow) -> Self {
        let worker = row.worker_name.map(|name| WorkerSummary {
            id: row.worker_id,
            name,
        });
        Schedule {
            id: row.id,
            worker_id: row.worker_id,
            date: row.date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            worker,
        }
    }
}

/// Schedule repository implementation
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Schedules of one worker, newest date first
    pub async fn find_by_worker(&self, worker_id: Id) -> RepositoryResult<Vec<Schedule>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "{SELECT} WHERE s.worker_id = $1 ORDER BY s.date DESC, s.id DESC"
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Schedule::from).collect())
    }

    /// Re-read a row written by `create`/`update` through the worker join
    async fn fetch_written(&self, id: Id) -> RepositoryResult<Schedule> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(Schedule::TYPE_NAME, id))
    }
}

#[async_trait]
impl Repository<Schedule, ScheduleInput> for ScheduleRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Schedule>> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!("{SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Schedule::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Schedule>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "{SELECT} ORDER BY s.date DESC, s.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Schedule::from).collect())
    }

    async fn create(&self, input: ScheduleInput) -> RepositoryResult<Schedule> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO schedules (worker_id, date, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(input.worker_id)
        .bind(input.date)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        self.fetch_written(id).await
    }

    async fn update(&self, id: Id, input: ScheduleInput) -> RepositoryResult<Schedule> {
        let result = sqlx::query(
            r#"
            UPDATE schedules SET
                worker_id = $1,
                date = $2,
                updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(input.worker_id)
        .bind(input.date)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Schedule::TYPE_NAME, id));
        }

        self.fetch_written(id).await
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Schedule::TYPE_NAME, id));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM schedules WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(worker_name: Option<&str>) -> ScheduleRow {
        let now = Utc::now();
        ScheduleRow {
            id: 1,
            worker_id: 4,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            created_at: now,
            updated_at: now,
            worker_name: worker_name.map(String::from),
        }
    }

    #[test]
    fn test_worker_summary_embedded() {
        let schedule: Schedule = row(Some("Ayşe")).into();
        let worker = schedule.worker.unwrap();
        assert_eq!(worker.id, 4);
        assert_eq!(worker.name, "Ayşe");
    }

    #[test]
    fn test_missing_worker_omitted() {
        let schedule: Schedule = row(None).into();
        assert!(schedule.worker.is_none());
    }
}
