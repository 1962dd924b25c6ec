use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::internal::RegistryError;
use crate::types::db::{DurationUnit, course};

use super::update_mask::Patch;

/// Accreditation tags a course may carry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, poem_openapi::Enum,
)]
pub enum AdditionalInfoTag {
    #[serde(rename = "haccp&hygiene")]
    #[oai(rename = "haccp&hygiene")]
    HaccpHygiene,
    #[serde(rename = "city&guild")]
    #[oai(rename = "city&guild")]
    CityGuild,
    #[serde(rename = "nsda")]
    #[oai(rename = "nsda")]
    Nsda,
}

impl AdditionalInfoTag {
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        match raw.trim() {
            "haccp&hygiene" => Ok(AdditionalInfoTag::HaccpHygiene),
            "city&guild" => Ok(AdditionalInfoTag::CityGuild),
            "nsda" => Ok(AdditionalInfoTag::Nsda),
            other => Err(RegistryError::invalid_field(
                "additional_info",
                format!("unknown tag {:?}, expected one of haccp&hygiene, city&guild, nsda", other),
            )),
        }
    }
}

/// Encode tags for the `additional_info` text column, dropping repeats
pub fn encode_tags(tags: &[AdditionalInfoTag]) -> Result<String, RegistryError> {
    let mut tags = tags.to_vec();
    tags.sort();
    tags.dedup();
    serde_json::to_string(&tags)
        .map_err(|e| RegistryError::invalid_field("additional_info", e.to_string()))
}

/// Decode the `additional_info` column; an unreadable column yields no tags
pub fn decode_tags(raw: &str) -> Vec<AdditionalInfoTag> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(raw) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!("Unreadable additional_info column {:?}: {}", raw, e);
            Vec::new()
        }
    }
}

/// Course length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseDuration {
    pub value: f64,
    pub unit: DurationUnit,
}

/// Coerce a duration value sent as a number or a numeric string
pub fn coerce_duration_value(raw: &Value) -> Result<f64, RegistryError> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| RegistryError::invalid_field("duration_value", "must be a number"))?;

    if value <= 0.0 {
        return Err(RegistryError::invalid_field(
            "duration_value",
            "must be greater than zero",
        ));
    }
    Ok(value)
}

/// Validated input for course creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub course_name: String,
    pub course_code: String,
    pub duration: CourseDuration,
    pub description: String,
    pub additional_info: Vec<AdditionalInfoTag>,
    pub is_active: bool,
}

/// Update mask for a course
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseChanges {
    pub course_name: Patch<String>,
    pub course_code: Patch<String>,
    pub duration_value: Patch<f64>,
    pub duration_unit: Patch<DurationUnit>,
    pub description: Patch<String>,
    pub additional_info: Patch<Vec<AdditionalInfoTag>>,
    pub is_active: Patch<bool>,
}

impl CourseChanges {
    /// Apply the mask onto a loaded course; a partial duration keeps the other half
    pub fn apply(self, course: &mut course::Model) -> Result<(), RegistryError> {
        self.course_name.apply_to(&mut course.course_name);
        self.course_code.apply_to(&mut course.course_code);
        self.duration_value.apply_to(&mut course.duration_value);
        self.duration_unit.apply_to(&mut course.duration_unit);
        self.description.apply_to(&mut course.description);
        if let Patch::Set(tags) = self.additional_info {
            course.additional_info = encode_tags(&tags)?;
        }
        self.is_active.apply_to(&mut course.is_active);
        Ok(())
    }
}

/// Filters for the admin course list
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Case-insensitive substring over name, code and description
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Catalog summary for the course stats endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub average_duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duration_accepts_number_or_numeric_string() {
        assert_eq!(coerce_duration_value(&json!(6)).unwrap(), 6.0);
        assert_eq!(coerce_duration_value(&json!(" 1.5 ")).unwrap(), 1.5);
    }

    #[test]
    fn test_duration_rejects_non_positive_and_garbage() {
        assert!(coerce_duration_value(&json!(0)).is_err());
        assert!(coerce_duration_value(&json!("-2")).is_err());
        assert!(coerce_duration_value(&json!("six")).is_err());
        assert!(coerce_duration_value(&json!(null)).is_err());
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(
            AdditionalInfoTag::parse(" city&guild ").unwrap(),
            AdditionalInfoTag::CityGuild
        );
        assert!(AdditionalInfoTag::parse("iso9001").is_err());
    }

    #[test]
    fn test_tags_round_trip_through_column() {
        let encoded = encode_tags(&[
            AdditionalInfoTag::Nsda,
            AdditionalInfoTag::HaccpHygiene,
            AdditionalInfoTag::Nsda,
        ])
        .unwrap();
        assert_eq!(encoded, r#"["haccp&hygiene","nsda"]"#);
        assert_eq!(
            decode_tags(&encoded),
            vec![AdditionalInfoTag::HaccpHygiene, AdditionalInfoTag::Nsda]
        );
        assert!(decode_tags("").is_empty());
    }

    #[test]
    fn test_partial_duration_keeps_unit() {
        let mut course = course::Model {
            id: "c1".into(),
            course_name: "Food Safety L1".into(),
            course_code: "FS1".into(),
            duration_value: 6.0,
            duration_unit: DurationUnit::Years,
            description: String::new(),
            additional_info: "[]".into(),
            is_active: true,
            created_at: 0,
            updated_at: 0,
        };
        CourseChanges {
            duration_value: Patch::Set(9.0),
            ..Default::default()
        }
        .apply(&mut course)
        .unwrap();

        assert_eq!(course.duration_value, 9.0);
        assert_eq!(course.duration_unit, DurationUnit::Years);
        assert_eq!(course.course_name, "Food Safety L1");
    }
}
