use std::fmt;

use thiserror::Error;

/// Fields carrying a uniqueness constraint in the course and student registries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    StudentId,
    RegistrationNumber,
    CourseName,
    CourseCode,
}

impl UniqueField {
    /// Form field name reported to clients
    pub fn field_name(&self) -> &'static str {
        match self {
            UniqueField::StudentId => "student_id",
            UniqueField::RegistrationNumber => "registration_number",
            UniqueField::CourseName => "course_name",
            UniqueField::CourseCode => "course_code",
        }
    }

    /// Resolve the field from a storage constraint message such as
    /// `UNIQUE constraint failed: students.student_id_key`
    pub fn from_constraint_detail(detail: &str) -> Option<Self> {
        let candidates = [
            ("registration_number", UniqueField::RegistrationNumber),
            ("student_id", UniqueField::StudentId),
            ("course_name", UniqueField::CourseName),
            ("course_code", UniqueField::CourseCode),
        ];
        candidates
            .into_iter()
            .find(|(column, _)| detail.contains(column))
            .map(|(_, field)| field)
    }
}

/// A value that collided with an existing record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub field: UniqueField,
    pub value: String,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            UniqueField::StudentId => write!(f, "Student ID \"{}\" already exists", self.value),
            UniqueField::RegistrationNumber => {
                write!(f, "Registration Number \"{}\" already exists", self.value)
            }
            UniqueField::CourseName => f.write_str("Course name already exists"),
            UniqueField::CourseCode => f.write_str("Course code already exists"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid course selected")]
    InvalidCourse,

    #[error("{0}")]
    Duplicate(DuplicateKey),

    #[error("Student not found")]
    StudentNotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Search query is required")]
    EmptyQuery,
}

impl RegistryError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RegistryError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate(field: UniqueField, value: impl Into<String>) -> Self {
        RegistryError::Duplicate(DuplicateKey {
            field,
            value: value.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_messages_name_the_field() {
        assert_eq!(
            RegistryError::duplicate(UniqueField::StudentId, "STU-1").to_string(),
            "Student ID \"STU-1\" already exists"
        );
        assert_eq!(
            RegistryError::duplicate(UniqueField::RegistrationNumber, "R9").to_string(),
            "Registration Number \"R9\" already exists"
        );
        assert_eq!(
            RegistryError::duplicate(UniqueField::CourseName, "Food Safety L1").to_string(),
            "Course name already exists"
        );
    }

    #[test]
    fn test_missing_fields_lists_every_field() {
        let err = RegistryError::MissingFields(vec!["student_name".into(), "batch".into()]);
        assert_eq!(err.to_string(), "Missing required fields: student_name, batch");
    }

    #[test]
    fn test_constraint_detail_resolution() {
        assert_eq!(
            UniqueField::from_constraint_detail("UNIQUE constraint failed: students.student_id_key"),
            Some(UniqueField::StudentId)
        );
        assert_eq!(
            UniqueField::from_constraint_detail(
                "UNIQUE constraint failed: students.registration_number_key"
            ),
            Some(UniqueField::RegistrationNumber)
        );
        assert_eq!(
            UniqueField::from_constraint_detail("UNIQUE constraint failed: courses.course_code"),
            Some(UniqueField::CourseCode)
        );
        assert_eq!(UniqueField::from_constraint_detail("users.email"), None);
    }
}
