//! Schedule contract

use ag_core::error::ValidationErrors;
use ag_models::ScheduleInput;

use crate::base::{Contract, ValidationResult};

#[derive(Debug, Default)]
pub struct ScheduleContract;

impl ScheduleContract {
    pub fn new() -> Self {
        Self
    }
}

impl Contract<ScheduleInput> for ScheduleContract {
    fn validate(&self, entity: &ScheduleInput) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if entity.worker_id <= 0 {
            errors.add("worker_id", "can't be blank");
        }
        if entity.date.is_none() {
            errors.add("date", "can't be blank");
        }
        errors.into_result()
    }
}
