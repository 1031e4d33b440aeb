//! Worker model
//!
//! Table: workers

use chrono::{DateTime, Utc};
use ag_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::blank_to_none;

/// A farm worker (tractor driver, harvester driver, ...)
///
/// Workers are referenced by schedules and operations but own neither;
/// deleting a worker cascades through the store's foreign keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: Id,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Free-form role, e.g. "tractor_driver"
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for Worker {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Worker {
    const TYPE_NAME: &'static str = "Worker";
}

/// Write model for creating or replacing a worker
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WorkerInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50, message = "is too long (maximum is 50 characters)"))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub role: String,
}

impl WorkerInput {
    /// Trim text fields; blank optional fields become `None` so that an
    /// empty email never collides with the unique index.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: blank_to_none(self.email),
            phone: blank_to_none(self.phone),
            role: self.role.trim().to_string(),
        }
    }
}

/// Worker reference embedded in schedules and operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub id: Id,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_blanks() {
        let input = WorkerInput {
            name: "  Ayşe ".into(),
            email: Some("   ".into()),
            phone: Some("".into()),
            role: "tractor_driver ".into(),
        }
        .normalized();

        assert_eq!(input.name, "Ayşe");
        assert_eq!(input.email, None);
        assert_eq!(input.phone, None);
        assert_eq!(input.role, "tractor_driver");
    }

    #[test]
    fn test_missing_fields_deserialize_to_blank() {
        let input: WorkerInput = serde_json::from_str(r#"{"email": "a@b.io"}"#).unwrap();
        assert!(input.name.is_empty());
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_valid_input() {
        let input: WorkerInput =
            serde_json::from_str(r#"{"name": "Mehmet", "role": "harvester_driver"}"#).unwrap();
        assert!(input.validate().is_ok());
    }
}
