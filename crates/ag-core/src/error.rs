//! Core error types for Agroport
//!
//! Every failure a caller can observe falls into one of three buckets:
//! validation (400), not found (404) or storage/internal (500). Conflict is
//! kept separate for unique-key violations.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all Agroport operations
#[derive(Error, Debug)]
pub enum AgError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {}", .0.full_messages().join(", "))]
    Validation(#[from] ValidationErrors),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        AgError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a validation error with a single base message
    pub fn invalid(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        AgError::Validation(errors)
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AgError::NotFound { .. } => 404,
            AgError::Validation(_) => 400,
            AgError::Conflict { .. } => 409,
            AgError::Database(_) | AgError::Internal(_) => 500,
        }
    }
}

/// Validation errors collection
///
/// Field errors are kept in a `BTreeMap` so that rendered messages come out in
/// a stable order.
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => match error.code.as_ref() {
                        "length" => "can't be blank".to_string(),
                        "email" => "is not a valid email address".to_string(),
                        "range" => "is out of range".to_string(),
                        code => format!("is invalid ({})", code),
                    },
                };
                errors.add(field, message);
            }
        }
        errors
    }
}
