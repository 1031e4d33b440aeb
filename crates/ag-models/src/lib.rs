//! # ag-models
//!
//! Domain models for Agroport.
//!
//! Persisted entities (workers, fields, schedules, operations) implement the
//! core traits from `ag-core`. Report types are derived on demand and never
//! stored.

pub use ag_core::traits::{Entity, Id, Identifiable};

pub mod worker;
pub mod field;
pub mod schedule;
pub mod operation;
pub mod report;

pub use worker::{Worker, WorkerInput, WorkerSummary};
pub use field::{Field, FieldInput, FieldSummary};
pub use schedule::{Schedule, ScheduleInput};
pub use operation::{Operation, OperationInput};
pub use report::{ActivitySummary, DailyReport, FieldStats, PeriodReport, WorkerStats};

/// Trim a string and turn blanks into `None`
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
