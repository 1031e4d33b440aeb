//! Schedule model
//!
//! Table: schedules

use chrono::{DateTime, NaiveDate, Utc};
use ag_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};

use crate::worker::WorkerSummary;

/// Assignment of a worker to a work date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Id,
    pub worker_id: Id,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<WorkerSummary>,
}

impl Identifiable for Schedule {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Schedule {
    const TYPE_NAME: &'static str = "Schedule";
}

/// Write model for creating or replacing a schedule
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleInput {
    #[serde(default)]
    pub worker_id: Id,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
