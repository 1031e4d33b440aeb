//! Operation contracts
//!
//! `OperationContract` validates write models; `TransitionContract` guards
//! the status machine driven by the start/complete/reject actions:
//!
//! ```text
//! planned ──start──> in_progress ──complete──> completed
//!    └──────────────complete─────────────────────┘
//! any ──reject──> planned (worker and schedule cleared)
//! ```

use ag_core::error::ValidationErrors;
use ag_core::types::OperationStatus;
use ag_models::OperationInput;

use crate::base::{Contract, ValidationResult};

const MAX_TYPE_LENGTH: usize = 100;

/// Contract for creating and replacing operations
#[derive(Debug, Default)]
pub struct OperationContract;

impl OperationContract {
    pub fn new() -> Self {
        Self
    }

    fn validate_references(&self, entity: &OperationInput, errors: &mut ValidationErrors) {
        if entity.worker_id <= 0 {
            errors.add("worker_id", "can't be blank");
        }
        if entity.field_id <= 0 {
            errors.add("field_id", "can't be blank");
        }
        if matches!(entity.schedule_id, Some(id) if id <= 0) {
            errors.add("schedule_id", "is invalid");
        }
    }

    fn validate_type(&self, entity: &OperationInput, errors: &mut ValidationErrors) {
        let operation_type = entity.operation_type.trim();
        if operation_type.is_empty() {
            errors.add("type", "can't be blank");
        } else if operation_type.chars().count() > MAX_TYPE_LENGTH {
            errors.add("type", "is too long (maximum is 100 characters)");
        }
    }

    fn validate_times(&self, entity: &OperationInput, errors: &mut ValidationErrors) {
        match (entity.start_time, entity.end_time) {
            (Some(start), Some(end)) if end < start => {
                errors.add("end_time", "must be after start_time");
            }
            (None, Some(_)) => {
                errors.add("start_time", "can't be blank when end_time is set");
            }
            _ => {}
        }

        if entity.status_or_default() == OperationStatus::InProgress && entity.start_time.is_none() {
            errors.add("start_time", "can't be blank for an operation in progress");
        }
    }
}

impl Contract<OperationInput> for OperationContract {
    fn validate(&self, entity: &OperationInput) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        self.validate_references(entity, &mut errors);
        self.validate_type(entity, &mut errors);
        self.validate_times(entity, &mut errors);
        errors.into_result()
    }
}

/// Lifecycle actions exposed on `/operations/{id}/...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    Complete,
    Reject,
}

impl LifecycleAction {
    pub fn allowed_from(&self, current: OperationStatus) -> bool {
        match self {
            Self::Start => current == OperationStatus::Planned,
            Self::Complete => matches!(
                current,
                OperationStatus::Planned | OperationStatus::InProgress
            ),
            Self::Reject => true,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Reject => "reject",
        }
    }
}

/// Contract guarding a single lifecycle action
#[derive(Debug)]
pub struct TransitionContract {
    action: LifecycleAction,
}

impl TransitionContract {
    pub fn new(action: LifecycleAction) -> Self {
        Self { action }
    }
}

impl Contract<OperationStatus> for TransitionContract {
    fn validate(&self, current: &OperationStatus) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        if !self.action.allowed_from(*current) {
            errors.add(
                "status",
                format!(
                    "cannot {} an operation that is {}",
                    self.action.verb(),
                    current
                ),
            );
        }
        errors.into_result()
    }
}
