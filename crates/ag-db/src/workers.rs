//! Worker repository

use async_trait::async_trait;
use ag_core::traits::{Entity, Id};
use ag_models::{Worker, WorkerInput};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

const COLUMNS: &str = "id, name, email, phone, role, created_at, updated_at";

/// Worker database entity
#[derive(Debug, Clone, FromRow)]
pub struct WorkerRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkerRow> for Worker {
    fn from(row: WorkerRow) -> Self {
        Worker {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Worker repository implementation
#[derive(Clone)]
pub struct WorkerRepository {
    pool: PgPool,
}

impl WorkerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Worker, WorkerInput> for WorkerRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Worker>> {
        let row = sqlx::query_as::<_, WorkerRow>(&format!(
            "SELECT {COLUMNS} FROM workers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Worker::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Worker>> {
        let rows = sqlx::query_as::<_, WorkerRow>(&format!(
            "SELECT {COLUMNS} FROM workers ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Worker::from).collect())
    }

    async fn create(&self, input: WorkerInput) -> RepositoryResult<Worker> {
        let row = sqlx::query_as::<_, WorkerRow>(&format!(
            r#"
            INSERT INTO workers (name, email, phone, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.role)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        Ok(row.into())
    }

    async fn update(&self, id: Id, input: WorkerInput) -> RepositoryResult<Worker> {
        let row = sqlx::query_as::<_, WorkerRow>(&format!(
            r#"
            UPDATE workers SET
                name = $1,
                email = $2,
                phone = $3,
                role = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::classify)?
        .ok_or_else(|| RepositoryError::not_found(Worker::TYPE_NAME, id))?;

        Ok(row.into())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM workers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Worker::TYPE_NAME, id));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM workers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_model() {
        let now = Utc::now();
        let worker: Worker = WorkerRow {
            id: 3,
            name: "Mehmet".into(),
            email: None,
            phone: Some("+90 555 000 00 00".into()),
            role: "tractor_driver".into(),
            created_at: now,
            updated_at: now,
        }
        .into();

        assert_eq!(worker.id, 3);
        assert_eq!(worker.role, "tractor_driver");
        assert_eq!(worker.phone.as_deref(), Some("+90 555 000 00 00"));
    }
}
