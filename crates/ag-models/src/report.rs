//! Report models
//!
//! Reports are derived from the operations table on every request and are
//! never persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ag_core::traits::Id;
use serde::{Deserialize, Serialize};

/// Aggregates over the operations whose start time falls in a window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Distinct workers with at least one operation
    pub total_workers: i64,
    pub total_operations: i64,
    pub completed_operations: i64,
    pub in_progress_operations: i64,
    pub operations_by_type: BTreeMap<String, i64>,
    pub worker_stats: Vec<WorkerStats>,
    pub field_stats: Vec<FieldStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub worker_id: Id,
    pub worker_name: String,
    pub operations: i64,
    pub hours_worked: f64,
    pub fields_worked: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub field_id: Id,
    pub field_name: String,
    pub operations: i64,
    pub hours_worked: f64,
    pub workers_count: i64,
}

/// Activity for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub summary: ActivitySummary,
}

/// Activity for an inclusive date range (month, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(flatten)]
    pub summary: ActivitySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_report_is_flat() {
        let report = DailyReport {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            summary: ActivitySummary::default(),
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["total_workers"], 0);
        assert_eq!(json["completed_operations"], 0);
        assert!(json["operations_by_type"].as_object().unwrap().is_empty());
        assert!(json["worker_stats"].as_array().unwrap().is_empty());
        assert!(json.get("summary").is_none());
    }
}
