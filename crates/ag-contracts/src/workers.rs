//! Worker contract

use ag_core::error::ValidationErrors;
use ag_models::WorkerInput;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::base::{collect_derived, Contract, ValidationResult};

static PHONE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{4,19}$").expect("valid phone regex"));

/// Contract for creating and replacing workers
#[derive(Debug, Default)]
pub struct WorkerContract;

impl WorkerContract {
    pub fn new() -> Self {
        Self
    }

    fn validate_phone(&self, phone: Option<&str>, errors: &mut ValidationErrors) {
        if let Some(phone) = phone {
            if !PHONE_FORMAT.is_match(phone) {
                errors.add("phone", "is not a valid phone number");
            }
        }
    }
}

impl Contract<WorkerInput> for WorkerContract {
    fn validate(&self, entity: &WorkerInput) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        collect_derived(entity, &mut errors);
        self.validate_phone(entity.phone.as_deref(), &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, role: &str) -> WorkerInput {
        WorkerInput {
            name: name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_and_role_required() {
        let errors = WorkerContract::new().validate(&input("", "")).unwrap_err();
        assert_eq!(errors.errors.get("name"), Some(&vec!["can't be blank".to_string()]));
        assert!(errors.has_error("role"));
    }

    #[test]
    fn test_valid_worker() {
        let mut worker = input("Fatma", "tractor_driver");
        worker.email = Some("fatma@farm.example".into());
        worker.phone = Some("+90 532 000 00 00".into());
        assert!(WorkerContract::new().validate(&worker).is_ok());
    }

    #[test]
    fn test_bad_email_and_phone() {
        let mut worker = input("Fatma", "tractor_driver");
        worker.email = Some("not-an-email".into());
        worker.phone = Some("call me".into());

        let errors = WorkerContract::new().validate(&worker).unwrap_err();
        assert!(errors.has_error("email"));
        assert!(errors.has_error("phone"));
    }
}
