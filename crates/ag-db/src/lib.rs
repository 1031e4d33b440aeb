//! # ag-db
//!
//! Database layer for Agroport.
//!
//! This crate provides PostgreSQL database access using SQLx, including:
//!
//! - Connection pool management
//! - The bootstrap schema applied at startup
//! - Repositories for workers, fields, schedules and operations
//! - The source query behind activity reports
//!
//! ## Example
//!
//! ```ignore
//! use ag_db::{Database, DatabaseConfig};
//! use ag_db::workers::WorkerRepository;
//! use ag_db::repository::Repository;
//!
//! let config = DatabaseConfig::with_url(std::env::var("DATABASE_URL")?).with_env_overrides();
//! let db = Database::connect(&config).await?;
//! ag_db::schema::apply(db.pool()).await?;
//!
//! let repo = WorkerRepository::new(db.pool().clone());
//! let worker = repo.find_by_id(1).await?;
//! ```

pub mod pool;
pub mod repository;
pub mod schema;
pub mod workers;
pub mod fields;
pub mod schedules;
pub mod operations;
pub mod reports;

pub use sqlx;

// Re-exports
pub use pool::{Database, DatabaseConfig, PoolStats};
pub use repository::{Repository, RepositoryError, RepositoryResult};
pub use workers::{WorkerRepository, WorkerRow};
pub use fields::{FieldRepository, FieldRow};
pub use schedules::{ScheduleRepository, ScheduleRow};
pub use operations::{OperationFilter, OperationRepository, OperationRow};
pub use reports::{ReportOperationRow, ReportRepository};
