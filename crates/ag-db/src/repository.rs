//! Repository traits and error classification
//!
//! Provides the generic CRUD contract shared by the entity repositories.

use async_trait::async_trait;
use ag_core::error::AgError;
use ag_core::traits::Id;

/// SQLSTATE for foreign-key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for unique violations
const UNIQUE_VIOLATION: &str = "23505";

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A referenced row does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored value could not be mapped onto the domain model
    #[error("Corrupt row: {0}")]
    Decode(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        RepositoryError::NotFound { entity, id }
    }

    /// Map constraint violations raised by PostgreSQL onto domain errors;
    /// everything else stays a storage error.
    pub fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let detail = db_err
                .constraint()
                .map(|c| c.to_string())
                .unwrap_or_else(|| db_err.message().to_string());
            match db_err.code().as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => return RepositoryError::InvalidReference(detail),
                Some(UNIQUE_VIOLATION) => return RepositoryError::Conflict(detail),
                _ => {}
            }
        }
        RepositoryError::Database(err)
    }
}

impl From<RepositoryError> for AgError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => AgError::not_found(entity, id),
            RepositoryError::InvalidReference(detail) => {
                AgError::invalid(format!("Referenced record does not exist ({})", detail))
            }
            RepositoryError::Conflict(detail) => AgError::Conflict {
                message: format!("Duplicate value violates {}", detail),
            },
            RepositoryError::Database(e) => AgError::Database(e.to_string()),
            RepositoryError::Decode(msg) => AgError::Internal(msg),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
///
/// Updates are full replacements: the write model carries every column.
#[async_trait]
pub trait Repository<T, Input>: Send + Sync {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    async fn find_all(&self) -> RepositoryResult<Vec<T>>;

    async fn create(&self, input: Input) -> RepositoryResult<T>;

    /// Fails with `NotFound` when no row has this id
    async fn update(&self, id: Id, input: Input) -> RepositoryResult<T>;

    /// Fails with `NotFound` when no row has this id
    async fn delete(&self, id: Id) -> RepositoryResult<()>;

    async fn exists(&self, id: Id) -> RepositoryResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: AgError = RepositoryError::not_found("Worker", 9).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Worker with id 9 not found");
    }

    #[test]
    fn test_reference_and_conflict_mapping() {
        let err: AgError = RepositoryError::InvalidReference("operations_field_id_fkey".into()).into();
        assert_eq!(err.status_code(), 400);

        let err: AgError = RepositoryError::Conflict("workers_email_key".into()).into();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_non_database_errors_stay_storage_errors() {
        let err = RepositoryError::classify(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(_)));
        let err: AgError = err.into();
        assert_eq!(err.status_code(), 500);
    }
}
