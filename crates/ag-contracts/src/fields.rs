//! Field contract

use ag_core::error::ValidationErrors;
use ag_models::FieldInput;

use crate::base::{collect_derived, Contract, ValidationResult};

/// Contract for creating and replacing fields
///
/// Besides the derived rules, the boundary must be a GeoJSON geometry object
/// (an object carrying a string `type`).
#[derive(Debug, Default)]
pub struct FieldContract;

impl FieldContract {
    pub fn new() -> Self {
        Self
    }

    fn validate_coordinates(&self, coordinates: &serde_json::Value, errors: &mut ValidationErrors) {
        match coordinates {
            serde_json::Value::Null => errors.add("coordinates", "can't be blank"),
            serde_json::Value::Object(map) => {
                if !map.get("type").map(|t| t.is_string()).unwrap_or(false) {
                    errors.add("coordinates", "must be a GeoJSON object with a type");
                }
            }
            _ => errors.add("coordinates", "must be a GeoJSON object with a type"),
        }
    }
}

impl Contract<FieldInput> for FieldContract {
    fn validate(&self, entity: &FieldInput) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        collect_derived(entity, &mut errors);
        self.validate_coordinates(&entity.coordinates, &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn polygon() -> serde_json::Value {
        json!({"type": "Polygon", "coordinates": [[[32.1, 39.9], [32.2, 39.9], [32.2, 40.0], [32.1, 39.9]]]})
    }

    #[test]
    fn test_valid_field() {
        let field = FieldInput {
            name: "Lower terrace".into(),
            coordinates: polygon(),
            area: 42.5,
            crop_type: "wheat".into(),
            ..Default::default()
        };
        assert!(FieldContract::new().validate(&field).is_ok());
    }

    #[test]
    fn test_missing_coordinates() {
        let field = FieldInput {
            name: "Lower terrace".into(),
            ..Default::default()
        };
        let errors = FieldContract::new().validate(&field).unwrap_err();
        assert_eq!(errors.errors.get("coordinates"), Some(&vec!["can't be blank".to_string()]));
    }

    #[test]
    fn test_coordinates_must_be_geojson() {
        let field = FieldInput {
            name: "Lower terrace".into(),
            coordinates: json!([[1, 2], [3, 4]]),
            ..Default::default()
        };
        let errors = FieldContract::new().validate(&field).unwrap_err();
        assert!(errors.has_error("coordinates"));
        assert!(!errors.has_error("name"));
    }
}
