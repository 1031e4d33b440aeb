//! Operation model
//!
//! Table: operations
//!
//! An operation is a unit of field work (plowing, seeding, harvesting, ...)
//! done by a worker on a field, optionally as part of a schedule.

use chrono::{DateTime, Utc};
use ag_core::traits::{Entity, Id, Identifiable};
use ag_core::types::OperationStatus;
use serde::{Deserialize, Serialize};

use crate::blank_to_none;
use crate::field::FieldSummary;
use crate::worker::WorkerSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: Id,
    pub schedule_id: Option<Id>,
    /// Cleared when the operation is rejected
    pub worker_id: Option<Id>,
    pub field_id: Id,
    #[serde(rename = "type")]
    pub operation_type: String,
    pub description: Option<String>,
    pub status: OperationStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<WorkerSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldSummary>,
}

impl Identifiable for Operation {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Operation {
    const TYPE_NAME: &'static str = "Operation";
}

/// Write model for creating or replacing an operation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationInput {
    #[serde(default)]
    pub schedule_id: Option<Id>,
    #[serde(default)]
    pub worker_id: Id,
    #[serde(default)]
    pub field_id: Id,
    #[serde(default, rename = "type")]
    pub operation_type: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `planned` when omitted
    #[serde(default)]
    pub status: Option<OperationStatus>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OperationInput {
    pub fn normalized(self) -> Self {
        Self {
            operation_type: self.operation_type.trim().to_lowercase(),
            description: blank_to_none(self.description),
            notes: blank_to_none(self.notes),
            ..self
        }
    }

    pub fn status_or_default(&self) -> OperationStatus {
        self.status.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_name() {
        let input: OperationInput = serde_json::from_str(
            r#"{"worker_id": 1, "field_id": 2, "type": " Seeding ", "start_time": "2024-05-01T08:00:00Z"}"#,
        )
        .unwrap();
        let input = input.normalized();
        assert_eq!(input.operation_type, "seeding");
        assert_eq!(input.status_or_default(), OperationStatus::Planned);
        assert!(input.start_time.is_some());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let parsed: Result<OperationInput, _> =
            serde_json::from_str(r#"{"worker_id": 1, "field_id": 2, "type": "x", "status": "done"}"#);
        assert!(parsed.is_err());
    }
}
