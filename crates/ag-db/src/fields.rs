//! Field repository

use async_trait::async_trait;
use ag_core::traits::{Entity, Id};
use ag_models::{Field, FieldInput};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

const COLUMNS: &str =
    "id, name, description, coordinates, area, crop_type, period, region, created_at, updated_at";

/// Field database entity
#[derive(Debug, Clone, FromRow)]
pub struct FieldRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub coordinates: Json<serde_json::Value>,
    pub area: f64,
    pub crop_type: String,
    pub period: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FieldRow> for Field {
    fn from(row: FieldRow) -> Self {
        Field {
            id: row.id,
            name: row.name,
            description: row.description,
            coordinates: row.coordinates.0,
            area: row.area,
            crop_type: row.crop_type,
            period: row.period,
            region: row.region,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Field repository implementation
#[derive(Clone)]
pub struct FieldRepository {
    pool: PgPool,
}

impl FieldRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Field, FieldInput> for FieldRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Field>> {
        let row = sqlx::query_as::<_, FieldRow>(&format!(
            "SELECT {COLUMNS} FROM fields WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Field::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Field>> {
        let rows = sqlx::query_as::<_, FieldRow>(&format!(
            "SELECT {COLUMNS} FROM fields ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Field::from).collect())
    }

    async fn create(&self, input: FieldInput) -> RepositoryResult<Field> {
        let row = sqlx::query_as::<_, FieldRow>(&format!(
            r#"
            INSERT INTO fields (
                name, description, coordinates, area, crop_type, period, region,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, NOW(), NOW()
            )
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(Json(&input.coordinates))
        .bind(input.area)
        .bind(&input.crop_type)
        .bind(&input.period)
        .bind(&input.region)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        Ok(row.into())
    }

    async fn update(&self, id: Id, input: FieldInput) -> RepositoryResult<Field> {
        let row = sqlx::query_as::<_, FieldRow>(&format!(
            r#"
            UPDATE fields SET
                name = $1,
                description = $2,
                coordinates = $3,
                area = $4,
                crop_type = $5,
                period = $6,
                region = $7,
                updated_at = NOW()
            WHERE id = $8
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(Json(&input.coordinates))
        .bind(input.area)
        .bind(&input.crop_type)
        .bind(&input.period)
        .bind(&input.region)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::classify)?
        .ok_or_else(|| RepositoryError::not_found(Field::TYPE_NAME, id))?;

        Ok(row.into())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM fields WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(Field::TYPE_NAME, id));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM fields WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_into_model_unwraps_geojson() {
        let now = Utc::now();
        let polygon = json!({"type": "Polygon", "coordinates": [[[32.1, 39.9], [32.2, 39.9], [32.2, 40.0], [32.1, 39.9]]]});
        let field: Field = FieldRow {
            id: 7,
            name: "Lower terrace".into(),
            description: None,
            coordinates: Json(polygon.clone()),
            area: 42.5,
            crop_type: "wheat".into(),
            period: "2024 autumn".into(),
            region: "Konya".into(),
            created_at: now,
            updated_at: now,
        }
        .into();

        assert_eq!(field.coordinates, polygon);
        assert_eq!(field.area, 42.5);
    }
}
