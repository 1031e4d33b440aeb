//! Base contract system

use ag_core::error::ValidationErrors;
use validator::Validate;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;
}

/// Run the derive-based `validator` rules of a write model, collecting the
/// failures into `errors`.
pub fn collect_derived<T: Validate>(entity: &T, errors: &mut ValidationErrors) {
    if let Err(derived) = entity.validate() {
        errors.merge(derived.into());
    }
}
