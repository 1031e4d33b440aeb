//! Field model
//!
//! Table: fields

use chrono::{DateTime, Utc};
use ag_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::blank_to_none;

/// A cultivated field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    /// GeoJSON polygon describing the boundary
    pub coordinates: serde_json::Value,
    /// Area in decares
    pub area: f64,
    pub crop_type: String,
    /// Cultivation period, e.g. "2024 spring"
    pub period: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for Field {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Field {
    const TYPE_NAME: &'static str = "Field";
}

/// Write model for creating or replacing a field
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FieldInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub coordinates: serde_json::Value,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub area: f64,

    #[serde(default)]
    #[validate(length(max = 100, message = "is too long (maximum is 100 characters)"))]
    pub crop_type: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "is too long (maximum is 100 characters)"))]
    pub period: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "is too long (maximum is 255 characters)"))]
    pub region: String,
}

impl FieldInput {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: blank_to_none(self.description),
            crop_type: self.crop_type.trim().to_string(),
            period: self.period.trim().to_string(),
            region: self.region.trim().to_string(),
            ..self
        }
    }
}

/// Field reference embedded in operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub id: Id,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_area_rejected() {
        let input = FieldInput {
            name: "North plot".into(),
            area: -1.5,
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("area"));
    }

    #[test]
    fn test_coordinates_kept_verbatim() {
        let input: FieldInput = serde_json::from_str(
            r#"{"name": "A", "coordinates": {"type": "Polygon", "coordinates": [[[1,2],[3,4],[5,6],[1,2]]]}}"#,
        )
        .unwrap();
        assert_eq!(input.coordinates["type"], "Polygon");
        assert!(input.validate().is_ok());
    }
}
