use std::str::FromStr;

use chrono::{DateTime, NaiveDate};

use crate::errors::internal::RegistryError;
use crate::types::db::{Competency, DurationUnit, StudentStatus, course, student};

use super::update_mask::Patch;

/// Raw multipart text fields of a student create/update form
///
/// Every field is optional here; presence rules differ between create and update.
#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub student_name: Option<String>,
    pub fathers_name: Option<String>,
    pub student_id: Option<String>,
    pub registration_number: Option<String>,
    pub course: Option<String>,
    pub competency: Option<String>,
    pub batch: Option<String>,
    pub status: Option<String>,
    pub issue_date: Option<String>,
    pub completion_date: Option<String>,
    pub is_active: Option<String>,
    pub is_verified: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Validated input for student creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub student_name: String,
    pub fathers_name: String,
    pub student_id: String,
    pub registration_number: String,
    pub course_id: String,
    pub competency: Competency,
    pub batch: String,
    pub status: StudentStatus,
    pub issue_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_verified: bool,
    pub contact_number: String,
    pub email: String,
    pub address: String,
}

/// Update mask for a student
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentChanges {
    pub student_name: Patch<String>,
    pub fathers_name: Patch<String>,
    pub student_id: Patch<String>,
    pub registration_number: Patch<String>,
    pub course_id: Patch<String>,
    pub competency: Patch<Competency>,
    pub batch: Patch<String>,
    pub status: Patch<StudentStatus>,
    pub issue_date: Patch<NaiveDate>,
    pub completion_date: Patch<Option<NaiveDate>>,
    pub is_active: Patch<bool>,
    pub is_verified: Patch<bool>,
    pub contact_number: Patch<String>,
    pub email: Patch<String>,
    pub address: Patch<String>,
}

/// Course fields copied onto a student when the course reference is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSnapshot {
    pub course_id: String,
    pub course_name: String,
    pub course_code: String,
    pub duration_value: f64,
    pub duration_unit: DurationUnit,
}

impl From<&course::Model> for CourseSnapshot {
    fn from(course: &course::Model) -> Self {
        Self {
            course_id: course.id.clone(),
            course_name: course.course_name.clone(),
            course_code: course.course_code.clone(),
            duration_value: course.duration_value,
            duration_unit: course.duration_unit,
        }
    }
}

impl CourseSnapshot {
    pub fn apply_to(&self, student: &mut student::Model) {
        student.course_id = self.course_id.clone();
        student.course_name = self.course_name.clone();
        student.course_code = self.course_code.clone();
        student.course_duration_value = self.duration_value;
        student.course_duration_unit = self.duration_unit;
    }
}

/// Filters for the admin student list
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    /// Case-insensitive substring over names, identifiers, email and contact number
    pub search: Option<String>,
    pub status: Option<StudentStatus>,
    pub batch: Option<String>,
    pub course_id: Option<String>,
    pub competency: Option<Competency>,
    pub is_active: Option<bool>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Distinct values offered as list filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFacets {
    pub batches: Vec<String>,
    pub courses: Vec<FacetCourse>,
    pub statuses: Vec<String>,
    pub competencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacetCourse {
    pub id: String,
    pub name: String,
}

/// Student plus the current state of its referenced course
#[derive(Debug, Clone)]
pub struct StudentDetail {
    pub student: student::Model,
    pub course: Option<course::Model>,
}

/// Normalized form of a student identifier used for uniqueness
pub fn identifier_key(value: &str) -> String {
    value.trim().to_lowercase()
}

const REQUIRED_ON_CREATE: [&str; 9] = [
    "student_name",
    "fathers_name",
    "student_id",
    "registration_number",
    "course",
    "competency",
    "batch",
    "status",
    "issue_date",
];

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_enum<T>(field: &str, raw: &str) -> Result<T, RegistryError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| RegistryError::invalid_field(field, e.to_string()))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, RegistryError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| RegistryError::invalid_field(field, format!("'{}' is not a valid date", raw)))
}

fn parse_optional_date(field: &str, raw: &str) -> Result<Option<NaiveDate>, RegistryError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(field, raw).map(Some)
    }
}

/// Form booleans arrive as text
pub fn parse_flag(field: &str, raw: &str) -> Result<bool, RegistryError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => Err(RegistryError::invalid_field(
            field,
            format!("'{}' is not a boolean", other),
        )),
    }
}

fn optional_text(value: Option<String>) -> Patch<String> {
    Patch::from(value.map(|v| v.trim().to_string()))
}

impl StudentForm {
    /// Validate a create form: every required field present, enums and dates well formed
    pub fn into_new_student(self) -> Result<NewStudent, RegistryError> {
        let present = [
            &self.student_name,
            &self.fathers_name,
            &self.student_id,
            &self.registration_number,
            &self.course,
            &self.competency,
            &self.batch,
            &self.status,
            &self.issue_date,
        ];
        let missing: Vec<String> = REQUIRED_ON_CREATE
            .iter()
            .zip(present)
            .filter(|(_, value)| is_blank(value))
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::MissingFields(missing));
        }

        let competency = parse_enum("competency", &trimmed(self.competency))?;
        let status = parse_enum("status", &trimmed(self.status))?;
        let issue_date = parse_date("issue_date", &trimmed(self.issue_date))?;
        let completion_date = match self.completion_date {
            Some(raw) => parse_optional_date("completion_date", &raw)?,
            None => None,
        };
        let is_active = match self.is_active {
            Some(raw) if !raw.trim().is_empty() => parse_flag("is_active", &raw)?,
            _ => true,
        };
        let is_verified = match self.is_verified {
            Some(raw) if !raw.trim().is_empty() => parse_flag("is_verified", &raw)?,
            _ => false,
        };

        Ok(NewStudent {
            student_name: trimmed(self.student_name),
            fathers_name: trimmed(self.fathers_name),
            student_id: trimmed(self.student_id),
            registration_number: trimmed(self.registration_number),
            course_id: trimmed(self.course),
            competency,
            batch: trimmed(self.batch),
            status,
            issue_date,
            completion_date,
            is_active,
            is_verified,
            contact_number: trimmed(self.contact_number),
            email: trimmed(self.email).to_lowercase(),
            address: trimmed(self.address),
        })
    }

    /// Build an update mask: absent fields stay unset, present ones are parsed
    pub fn into_changes(self) -> Result<StudentChanges, RegistryError> {
        let course_id = match self.course {
            Some(raw) if raw.trim().is_empty() => return Err(RegistryError::InvalidCourse),
            other => optional_text(other),
        };

        Ok(StudentChanges {
            student_name: optional_text(self.student_name),
            fathers_name: optional_text(self.fathers_name),
            student_id: optional_text(self.student_id),
            registration_number: optional_text(self.registration_number),
            course_id,
            competency: Patch::from(self.competency)
                .try_map(|raw| parse_enum("competency", &raw))?,
            batch: optional_text(self.batch),
            status: Patch::from(self.status).try_map(|raw| parse_enum("status", &raw))?,
            issue_date: Patch::from(self.issue_date)
                .try_map(|raw| parse_date("issue_date", &raw))?,
            completion_date: Patch::from(self.completion_date)
                .try_map(|raw| parse_optional_date("completion_date", &raw))?,
            is_active: Patch::from(self.is_active).try_map(|raw| parse_flag("is_active", &raw))?,
            is_verified: Patch::from(self.is_verified)
                .try_map(|raw| parse_flag("is_verified", &raw))?,
            contact_number: optional_text(self.contact_number),
            email: optional_text(self.email).map(|email| email.to_lowercase()),
            address: optional_text(self.address),
        })
    }
}

impl NewStudent {
    /// Build the record to insert; photo fields start empty and timestamps are stamped by the store
    pub fn into_record(self, id: String, snapshot: &CourseSnapshot) -> student::Model {
        let mut record = student::Model {
            id,
            student_name: self.student_name,
            fathers_name: self.fathers_name,
            student_id_key: identifier_key(&self.student_id),
            student_id: self.student_id,
            registration_number_key: identifier_key(&self.registration_number),
            registration_number: self.registration_number,
            course_id: self.course_id,
            course_name: String::new(),
            course_code: String::new(),
            course_duration_value: 0.0,
            course_duration_unit: DurationUnit::default(),
            competency: self.competency,
            batch: self.batch,
            status: self.status,
            is_active: self.is_active,
            is_verified: self.is_verified,
            issue_date: self.issue_date,
            completion_date: self.completion_date,
            photo_url: String::new(),
            photo_public_id: String::new(),
            contact_number: self.contact_number,
            email: self.email,
            address: self.address,
            created_at: 0,
            updated_at: 0,
        };
        snapshot.apply_to(&mut record);
        record
    }
}

impl StudentChanges {
    /// Apply every set field except the course reference, which needs a lookup
    pub fn apply(self, student: &mut student::Model) {
        self.student_name.apply_to(&mut student.student_name);
        self.fathers_name.apply_to(&mut student.fathers_name);
        if let Patch::Set(student_id) = self.student_id {
            student.student_id_key = identifier_key(&student_id);
            student.student_id = student_id;
        }
        if let Patch::Set(registration_number) = self.registration_number {
            student.registration_number_key = identifier_key(&registration_number);
            student.registration_number = registration_number;
        }
        self.competency.apply_to(&mut student.competency);
        self.batch.apply_to(&mut student.batch);
        self.status.apply_to(&mut student.status);
        self.issue_date.apply_to(&mut student.issue_date);
        self.completion_date.apply_to(&mut student.completion_date);
        self.is_active.apply_to(&mut student.is_active);
        self.is_verified.apply_to(&mut student.is_verified);
        self.contact_number.apply_to(&mut student.contact_number);
        self.email.apply_to(&mut student.email);
        self.address.apply_to(&mut student.address);
    }
}

/// Record-level validation run on the fully merged student right before it is written
pub fn check_record(student: &student::Model) -> Result<(), RegistryError> {
    let required = [
        ("student_name", &student.student_name),
        ("fathers_name", &student.fathers_name),
        ("student_id", &student.student_id),
        ("registration_number", &student.registration_number),
        ("course", &student.course_id),
        ("batch", &student.batch),
    ];
    let missing: Vec<String> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RegistryError::MissingFields(missing));
    }

    if !(student.course_duration_value > 0.0) {
        return Err(RegistryError::invalid_field(
            "course_duration",
            "must be greater than zero",
        ));
    }
    if let Some(completion) = student.completion_date {
        if completion < student.issue_date {
            return Err(RegistryError::invalid_field(
                "completion_date",
                "must not be before issue_date",
            ));
        }
    }
    if !student.email.is_empty() && !student.email.contains('@') {
        return Err(RegistryError::invalid_field(
            "email",
            "must be a valid email address",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> StudentForm {
        StudentForm {
            student_name: Some(" Amina Rahman ".into()),
            fathers_name: Some("Karim Rahman".into()),
            student_id: Some("STU-001".into()),
            registration_number: Some("REG-001".into()),
            course: Some("course-1".into()),
            competency: Some("competent".into()),
            batch: Some("2025-A".into()),
            status: Some("active".into()),
            issue_date: Some("2025-01-15".into()),
            email: Some(" Amina@Example.COM ".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_form_trims_and_defaults() {
        let student = full_form().into_new_student().unwrap();
        assert_eq!(student.student_name, "Amina Rahman");
        assert_eq!(student.email, "amina@example.com");
        assert!(student.is_active);
        assert!(!student.is_verified);
        assert_eq!(student.completion_date, None);
    }

    #[test]
    fn test_create_form_lists_missing_fields() {
        let form = StudentForm {
            batch: Some("   ".into()),
            status: None,
            ..full_form()
        };
        match form.into_new_student() {
            Err(RegistryError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["batch".to_string(), "status".to_string()]);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_create_form_rejects_unknown_enum() {
        let form = StudentForm {
            status: Some("graduated".into()),
            ..full_form()
        };
        assert!(matches!(
            form.into_new_student(),
            Err(RegistryError::InvalidField { ref field, .. }) if field == "status"
        ));
    }

    #[test]
    fn test_dates_accept_timestamps() {
        assert_eq!(
            parse_date("issue_date", "2025-03-01T10:00:00.000Z").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("issue_date", "03/01/2025").is_err());
    }

    #[test]
    fn test_update_mask_only_sets_present_fields() {
        let changes = StudentForm {
            batch: Some(" 2025-B ".into()),
            completion_date: Some(String::new()),
            ..Default::default()
        }
        .into_changes()
        .unwrap();

        assert_eq!(changes.batch, Patch::Set("2025-B".to_string()));
        assert_eq!(changes.completion_date, Patch::Set(None));
        assert_eq!(changes.student_id, Patch::Unset);
        assert_eq!(changes.course_id, Patch::Unset);
    }

    #[test]
    fn test_update_with_blank_course_is_invalid() {
        let result = StudentForm {
            course: Some(" ".into()),
            ..Default::default()
        }
        .into_changes();
        assert!(matches!(result, Err(RegistryError::InvalidCourse)));
    }

    #[test]
    fn test_identifier_key_is_case_insensitive() {
        assert_eq!(identifier_key(" Stu-001 "), identifier_key("STU-001"));
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag("is_active", "TRUE").unwrap());
        assert!(!parse_flag("is_active", "0").unwrap());
        assert!(parse_flag("is_active", "maybe").is_err());
    }
}
