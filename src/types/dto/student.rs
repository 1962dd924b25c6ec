use chrono::NaiveDate;
use poem_openapi::types::multipart::Upload;
use poem_openapi::{ApiResponse, Multipart, Object, payload::Json};

use crate::types::db::{Competency, DurationUnit, StudentStatus, student};
use crate::types::internal::student::{FacetCourse, StudentDetail, StudentFacets, StudentForm};

use super::common::PaginationMeta;
use super::course::CourseResponse;

/// Multipart body for student create and update
///
/// Text parts arrive as strings and are validated afterwards; `image` is an optional photo.
#[derive(Multipart, Debug)]
pub struct StudentFormPayload {
    pub student_name: Option<String>,
    pub fathers_name: Option<String>,
    pub student_id: Option<String>,
    pub registration_number: Option<String>,
    /// Course id
    pub course: Option<String>,
    pub competency: Option<String>,
    pub batch: Option<String>,
    pub status: Option<String>,
    /// `YYYY-MM-DD`
    pub issue_date: Option<String>,
    /// `YYYY-MM-DD`; an empty value clears it on update
    pub completion_date: Option<String>,
    pub is_active: Option<String>,
    pub is_verified: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub image: Option<Upload>,
}

impl StudentFormPayload {
    /// Split into validated-later text fields and the optional upload
    pub fn into_parts(self) -> (StudentForm, Option<Upload>) {
        let form = StudentForm {
            student_name: self.student_name,
            fathers_name: self.fathers_name,
            student_id: self.student_id,
            registration_number: self.registration_number,
            course: self.course,
            competency: self.competency,
            batch: self.batch,
            status: self.status,
            issue_date: self.issue_date,
            completion_date: self.completion_date,
            is_active: self.is_active,
            is_verified: self.is_verified,
            contact_number: self.contact_number,
            email: self.email,
            address: self.address,
        };
        (form, self.image)
    }
}

/// Course fields as they were when the course was assigned to the student
#[derive(Object, Debug, Clone, PartialEq)]
pub struct CourseSnapshotResponse {
    pub id: String,
    pub course_name: String,
    pub course_code: String,
    pub duration_value: f64,
    pub duration_unit: DurationUnit,
}

/// Student as returned to admins
#[derive(Object, Debug, Clone, PartialEq)]
pub struct StudentResponse {
    pub id: String,
    pub student_name: String,
    pub fathers_name: String,
    pub student_id: String,
    pub registration_number: String,
    pub course: CourseSnapshotResponse,
    pub competency: Competency,
    pub batch: String,
    pub status: StudentStatus,
    pub is_active: bool,
    pub is_verified: bool,
    pub issue_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub photo_url: String,
    pub photo_public_id: String,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<student::Model> for StudentResponse {
    fn from(s: student::Model) -> Self {
        Self {
            id: s.id,
            student_name: s.student_name,
            fathers_name: s.fathers_name,
            student_id: s.student_id,
            registration_number: s.registration_number,
            course: CourseSnapshotResponse {
                id: s.course_id,
                course_name: s.course_name,
                course_code: s.course_code,
                duration_value: s.course_duration_value,
                duration_unit: s.course_duration_unit,
            },
            competency: s.competency,
            batch: s.batch,
            status: s.status,
            is_active: s.is_active,
            is_verified: s.is_verified,
            issue_date: s.issue_date,
            completion_date: s.completion_date,
            photo_url: s.photo_url,
            photo_public_id: s.photo_public_id,
            contact_number: s.contact_number,
            email: s.email,
            address: s.address,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Student as shown on public verification pages; the media handle is withheld
#[derive(Object, Debug, Clone, PartialEq)]
pub struct PublicStudentResponse {
    pub id: String,
    pub student_name: String,
    pub fathers_name: String,
    pub student_id: String,
    pub registration_number: String,
    pub course: CourseSnapshotResponse,
    pub competency: Competency,
    pub batch: String,
    pub status: StudentStatus,
    pub is_verified: bool,
    pub issue_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub photo_url: String,
}

impl From<student::Model> for PublicStudentResponse {
    fn from(s: student::Model) -> Self {
        let full = StudentResponse::from(s);
        Self {
            id: full.id,
            student_name: full.student_name,
            fathers_name: full.fathers_name,
            student_id: full.student_id,
            registration_number: full.registration_number,
            course: full.course,
            competency: full.competency,
            batch: full.batch,
            status: full.status,
            is_verified: full.is_verified,
            issue_date: full.issue_date,
            completion_date: full.completion_date,
            photo_url: full.photo_url,
        }
    }
}

/// Verification lookup: the student plus the referenced course as it is now
#[derive(Object, Debug)]
pub struct StudentDetailResponse {
    pub student: PublicStudentResponse,
    /// Absent when the course has since been deleted
    pub current_course: Option<CourseResponse>,
}

impl From<StudentDetail> for StudentDetailResponse {
    fn from(detail: StudentDetail) -> Self {
        Self {
            student: detail.student.into(),
            current_course: detail.course.map(CourseResponse::from),
        }
    }
}

#[derive(Object, Debug)]
pub struct StudentEnvelope {
    pub message: String,
    pub data: StudentResponse,
}

#[derive(Object, Debug)]
pub struct PublicStudentEnvelope {
    pub message: String,
    pub data: PublicStudentResponse,
}

#[derive(Object, Debug, PartialEq)]
pub struct FacetCourseResponse {
    pub id: String,
    pub name: String,
}

#[derive(Object, Debug, PartialEq)]
pub struct StudentFacetsResponse {
    pub batches: Vec<String>,
    pub courses: Vec<FacetCourseResponse>,
    pub statuses: Vec<String>,
    pub competencies: Vec<String>,
}

impl From<StudentFacets> for StudentFacetsResponse {
    fn from(facets: StudentFacets) -> Self {
        Self {
            batches: facets.batches,
            courses: facets
                .courses
                .into_iter()
                .map(|FacetCourse { id, name }| FacetCourseResponse { id, name })
                .collect(),
            statuses: facets.statuses,
            competencies: facets.competencies,
        }
    }
}

#[derive(Object, Debug)]
pub struct StudentListResponse {
    pub data: Vec<StudentResponse>,
    pub pagination: PaginationMeta,
    pub filters: StudentFacetsResponse,
}

#[derive(Object, Debug)]
pub struct StudentSearchResponse {
    pub message: String,
    pub data: Vec<StudentResponse>,
    pub count: u64,
}

/// API response for student creation
#[derive(ApiResponse)]
pub enum CreateStudentApiResponse {
    #[oai(status = 201)]
    Created(Json<StudentEnvelope>),
}
