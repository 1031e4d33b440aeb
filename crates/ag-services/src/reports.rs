//! Activity report aggregation
//!
//! A report is a pure function of the operation rows that started inside
//! the window and the instant `now`. Open operations (no end time) are
//! measured up to `now`, so their hours grow between regenerations.

use std::collections::{BTreeMap, BTreeSet};

use ag_core::result::AgResult;
use ag_core::traits::Id;
use ag_core::types::{OperationStatus, ReportWindow};
use ag_db::reports::{ReportOperationRow, ReportRepository};
use ag_db::repository::RepositoryResult;
use ag_models::{ActivitySummary, DailyReport, FieldStats, PeriodReport, WorkerStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Source of the rows a report is aggregated from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn operations_in(&self, window: &ReportWindow) -> RepositoryResult<Vec<ReportOperationRow>>;
}

#[async_trait]
impl ReportSource for ReportRepository {
    async fn operations_in(&self, window: &ReportWindow) -> RepositoryResult<Vec<ReportOperationRow>> {
        ReportRepository::operations_in(self, window).await
    }
}

/// Hours between start and end (or `now` while still open), never negative
pub fn hours_between(start: DateTime<Utc>, end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let millis = (end.unwrap_or(now) - start).num_milliseconds().max(0);
    millis as f64 / MILLIS_PER_HOUR
}

#[derive(Default)]
struct WorkerAcc {
    name: String,
    operations: i64,
    hours: f64,
    fields: BTreeSet<Id>,
}

#[derive(Default)]
struct FieldAcc {
    name: String,
    operations: i64,
    hours: f64,
    workers: BTreeSet<Id>,
}

/// Aggregate the operations of `window`
///
/// Rows whose start time lies outside the window are ignored. Operations
/// without a worker count towards the totals and the field statistics but
/// not towards `total_workers` or `worker_stats`.
pub fn aggregate(window: &ReportWindow, now: DateTime<Utc>, rows: &[ReportOperationRow]) -> ActivitySummary {
    let mut summary = ActivitySummary::default();
    let mut workers: BTreeMap<Id, WorkerAcc> = BTreeMap::new();
    let mut fields: BTreeMap<Id, FieldAcc> = BTreeMap::new();

    for row in rows.iter().filter(|r| window.contains(r.start_time)) {
        summary.total_operations += 1;
        if row.status == OperationStatus::Completed.as_str() {
            summary.completed_operations += 1;
        } else if row.status == OperationStatus::InProgress.as_str() {
            summary.in_progress_operations += 1;
        }
        *summary
            .operations_by_type
            .entry(row.operation_type.clone())
            .or_insert(0) += 1;

        let hours = hours_between(row.start_time, row.end_time, now);

        if let Some(worker_id) = row.worker_id {
            let acc = workers.entry(worker_id).or_default();
            if let Some(name) = &row.worker_name {
                acc.name.clone_from(name);
            }
            acc.operations += 1;
            acc.hours += hours;
            acc.fields.insert(row.field_id);
        }

        let acc = fields.entry(row.field_id).or_default();
        if let Some(name) = &row.field_name {
            acc.name.clone_from(name);
        }
        acc.operations += 1;
        acc.hours += hours;
        if let Some(worker_id) = row.worker_id {
            acc.workers.insert(worker_id);
        }
    }

    summary.total_workers = workers.len() as i64;

    summary.worker_stats = workers
        .into_iter()
        .map(|(worker_id, acc)| WorkerStats {
            worker_id,
            worker_name: acc.name,
            operations: acc.operations,
            hours_worked: acc.hours,
            fields_worked: acc.fields.len() as i64,
        })
        .collect();
    summary
        .worker_stats
        .sort_by(|a, b| a.worker_name.cmp(&b.worker_name).then(a.worker_id.cmp(&b.worker_id)));

    summary.field_stats = fields
        .into_iter()
        .map(|(field_id, acc)| FieldStats {
            field_id,
            field_name: acc.name,
            operations: acc.operations,
            hours_worked: acc.hours,
            workers_count: acc.workers.len() as i64,
        })
        .collect();
    summary
        .field_stats
        .sort_by(|a, b| a.field_name.cmp(&b.field_name).then(a.field_id.cmp(&b.field_id)));

    summary
}

/// Builds reports from a [`ReportSource`]
pub struct ReportService<S> {
    source: S,
}

impl<S: ReportSource> ReportService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn summary(&self, window: &ReportWindow, now: DateTime<Utc>) -> AgResult<ActivitySummary> {
        let rows = self.source.operations_in(window).await.map_err(|e| {
            tracing::error!(error = %e, from = %window.from, to = %window.to, "Report query failed");
            e
        })?;

        let summary = aggregate(window, now, &rows);
        tracing::debug!(
            from = %window.from,
            to = %window.to,
            operations = summary.total_operations,
            workers = summary.total_workers,
            "Report generated"
        );
        Ok(summary)
    }

    pub async fn daily(&self, window: &ReportWindow, now: DateTime<Utc>) -> AgResult<DailyReport> {
        Ok(DailyReport {
            date: window.from,
            summary: self.summary(window, now).await?,
        })
    }

    pub async fn period(&self, window: &ReportWindow, now: DateTime<Utc>) -> AgResult<PeriodReport> {
        Ok(PeriodReport {
            from: window.from,
            to: window.to,
            summary: self.summary(window, now).await?,
        })
    }
}
