use poem_openapi::{ApiResponse, Object, payload::Json};
use serde_json::Value;

use crate::errors::internal::RegistryError;
use crate::types::db::{DurationUnit, course};
use crate::types::internal::Patch;
use crate::types::internal::course::{
    AdditionalInfoTag, CourseChanges, CourseDuration, CourseStats, NewCourse,
    coerce_duration_value, decode_tags,
};

use super::common::PaginationMeta;

/// Nested duration as sent by clients; `value` may be a number or a numeric string
#[derive(Object, Debug, Clone, Default)]
pub struct DurationInput {
    pub value: Option<Value>,
    pub unit: Option<String>,
}

/// Course create/update body
///
/// Duration is accepted nested (`duration: {value, unit}`) or flat
/// (`duration_value`, `duration_unit`); the nested form wins when both are sent.
#[derive(Object, Debug, Clone, Default)]
pub struct CourseRequest {
    pub course_name: Option<String>,
    pub course_code: Option<String>,
    pub duration: Option<DurationInput>,
    pub duration_value: Option<Value>,
    pub duration_unit: Option<String>,
    pub description: Option<String>,
    pub additional_info: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_unit(raw: &str) -> Result<DurationUnit, RegistryError> {
    raw.parse::<DurationUnit>()
        .map_err(|e| RegistryError::invalid_field("duration_unit", e.to_string()))
}

fn parse_tags(raw: Vec<String>) -> Result<Vec<AdditionalInfoTag>, RegistryError> {
    raw.iter()
        .filter(|tag| !tag.trim().is_empty())
        .map(|tag| AdditionalInfoTag::parse(tag))
        .collect()
}

impl CourseRequest {
    /// Duration value and unit from whichever form the client used
    fn duration_parts(&mut self) -> (Option<Value>, Option<String>) {
        let nested = self.duration.take().unwrap_or_default();
        let value = nested
            .value
            .filter(|v| !v.is_null())
            .or_else(|| self.duration_value.take().filter(|v| !v.is_null()));
        let unit = non_blank(nested.unit).or_else(|| non_blank(self.duration_unit.take()));
        (value, unit)
    }

    pub fn into_new_course(mut self) -> Result<NewCourse, RegistryError> {
        let (value, unit) = self.duration_parts();
        let course_name = non_blank(self.course_name);
        let course_code = non_blank(self.course_code);

        let missing: Vec<String> = [
            ("course_name", course_name.is_none()),
            ("course_code", course_code.is_none()),
            ("duration_value", value.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        let (Some(course_name), Some(course_code), Some(value)) = (course_name, course_code, value)
        else {
            return Err(RegistryError::MissingFields(missing));
        };

        Ok(NewCourse {
            course_name,
            course_code,
            duration: CourseDuration {
                value: coerce_duration_value(&value)?,
                unit: unit.as_deref().map(parse_unit).transpose()?.unwrap_or_default(),
            },
            description: self
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            additional_info: parse_tags(self.additional_info.unwrap_or_default())?,
            is_active: self.is_active.unwrap_or(true),
        })
    }

    pub fn into_changes(mut self) -> Result<CourseChanges, RegistryError> {
        let (value, unit) = self.duration_parts();

        let required_text = |field: &str, value: Option<String>| -> Result<Patch<String>, RegistryError> {
            match value {
                None => Ok(Patch::Unset),
                Some(v) if v.trim().is_empty() => {
                    Err(RegistryError::invalid_field(field, "must not be empty"))
                }
                Some(v) => Ok(Patch::Set(v.trim().to_string())),
            }
        };

        Ok(CourseChanges {
            course_name: required_text("course_name", self.course_name)?,
            course_code: required_text("course_code", self.course_code)?,
            duration_value: Patch::from(value).try_map(|v| coerce_duration_value(&v))?,
            duration_unit: Patch::from(unit).try_map(|u| parse_unit(&u))?,
            description: Patch::from(self.description).map(|d| d.trim().to_string()),
            additional_info: Patch::from(self.additional_info).try_map(parse_tags)?,
            is_active: Patch::from(self.is_active),
        })
    }
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct DurationResponse {
    pub value: f64,
    pub unit: DurationUnit,
}

/// Course as returned to clients
#[derive(Object, Debug, Clone, PartialEq)]
pub struct CourseResponse {
    pub id: String,
    pub course_name: String,
    pub course_code: String,
    pub duration: DurationResponse,
    pub description: String,
    pub additional_info: Vec<AdditionalInfoTag>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        Self {
            additional_info: decode_tags(&course.additional_info),
            id: course.id,
            course_name: course.course_name,
            course_code: course.course_code,
            duration: DurationResponse {
                value: course.duration_value,
                unit: course.duration_unit,
            },
            description: course.description,
            is_active: course.is_active,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// A course plus the outcome message of the action that produced it
#[derive(Object, Debug)]
pub struct CourseEnvelope {
    pub message: String,
    pub data: CourseResponse,
}

#[derive(Object, Debug)]
pub struct CourseListResponse {
    pub data: Vec<CourseResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Object, Debug)]
pub struct ActiveCoursesResponse {
    pub data: Vec<CourseResponse>,
    pub count: u64,
}

#[derive(Object, Debug, PartialEq)]
pub struct CourseStatsResponse {
    pub total_courses: u64,
    pub active_courses: u64,
    pub inactive_courses: u64,
    /// Mean duration value across all courses; absent when there are none
    pub average_duration: Option<f64>,
}

impl From<CourseStats> for CourseStatsResponse {
    fn from(stats: CourseStats) -> Self {
        Self {
            total_courses: stats.total,
            active_courses: stats.active,
            inactive_courses: stats.inactive,
            average_duration: stats.average_duration,
        }
    }
}

/// API response for course creation
#[derive(ApiResponse)]
pub enum CreateCourseApiResponse {
    #[oai(status = 201)]
    Created(Json<CourseEnvelope>),
}
