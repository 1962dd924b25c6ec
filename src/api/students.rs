use std::sync::Arc;

use poem::Request;
use poem_openapi::{
    OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};

use crate::app_data::AppData;
use crate::coordinators::StudentCoordinator;
use crate::errors::api::ErrorExposure;
use crate::errors::{InternalError, RegistryApiError};
use crate::providers::{AccessGate, Requirement};
use crate::types::db::{Competency, StudentStatus};
use crate::types::dto::common::{MessageResponse, PaginationMeta, toggle_message};
use crate::types::dto::student::{
    CreateStudentApiResponse, PublicStudentEnvelope, StudentDetailResponse, StudentEnvelope,
    StudentFormPayload, StudentListResponse, StudentResponse, StudentSearchResponse,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::pagination::PageRequest;
use crate::types::internal::student::StudentFilter;

use super::auth::SessionAuth;
use super::helpers::{filter_value, parse_bool_filter, parse_date_filter, parse_filter, read_upload};

/// Student registry endpoints
pub struct StudentsApi {
    student_coordinator: Arc<StudentCoordinator>,
    access_gate: Arc<AccessGate>,
    error_exposure: ErrorExposure,
}

impl StudentsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            access_gate: app_data.access_gate.clone(),
            error_exposure: app_data.error_exposure,
            student_coordinator: Arc::new(StudentCoordinator::new(app_data)),
        }
    }

    async fn admin_context(&self, req: &Request, auth: &SessionAuth) -> Result<RequestContext, RegistryApiError> {
        self.access_gate
            .authorize(req, auth.token(), Requirement::Admin)
            .await
            .map_err(|e| self.fail(e))
    }

    fn fail(&self, err: impl Into<InternalError>) -> RegistryApiError {
        RegistryApiError::from_internal_error(err.into(), self.error_exposure)
    }
}

/// API tags for student endpoints
#[derive(Tags)]
enum StudentTags {
    /// Student registry
    Students,
    /// Public certificate verification
    Verification,
}

#[OpenApi(prefix_path = "/students")]
impl StudentsApi {
    /// Paginated, filtered student list with the available filter values
    ///
    /// Any filter set to `all` is ignored. `date_from` / `date_to` bound the issue date.
    #[oai(path = "/all", method = "get", tag = "StudentTags::Students")]
    async fn list_all(
        &self,
        req: &Request,
        auth: SessionAuth,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
        search: Query<Option<String>>,
        status: Query<Option<String>>,
        batch: Query<Option<String>>,
        course: Query<Option<String>>,
        competency: Query<Option<String>>,
        is_active: Query<Option<String>>,
        date_from: Query<Option<String>>,
        date_to: Query<Option<String>>,
    ) -> Result<Json<StudentListResponse>, RegistryApiError> {
        self.admin_context(req, &auth).await?;

        let filter = StudentFilter {
            search: filter_value(search.0),
            status: parse_filter::<StudentStatus>("status", status.0).map_err(|e| self.fail(e))?,
            batch: filter_value(batch.0),
            course_id: filter_value(course.0),
            competency: parse_filter::<Competency>("competency", competency.0)
                .map_err(|e| self.fail(e))?,
            is_active: parse_bool_filter("is_active", is_active.0).map_err(|e| self.fail(e))?,
            date_from: parse_date_filter("date_from", date_from.0).map_err(|e| self.fail(e))?,
            date_to: parse_date_filter("date_to", date_to.0).map_err(|e| self.fail(e))?,
        };

        let (page, facets) = self
            .student_coordinator
            .list(&filter, PageRequest::new(page.0, limit.0))
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(StudentListResponse {
            pagination: PaginationMeta::from(&page),
            data: page.items.into_iter().map(StudentResponse::from).collect(),
            filters: facets.into(),
        }))
    }

    /// Create a student from a multipart form with an optional `image` file
    #[oai(path = "/create", method = "post", tag = "StudentTags::Students")]
    async fn create(
        &self,
        req: &Request,
        auth: SessionAuth,
        form: StudentFormPayload,
    ) -> Result<CreateStudentApiResponse, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        let (form, image) = form.into_parts();
        let image = read_upload(image).await.map_err(|e| self.fail(e))?;

        let student = self
            .student_coordinator
            .create(&ctx, form, image)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(CreateStudentApiResponse::Created(Json(StudentEnvelope {
            message: "Student created successfully".to_string(),
            data: student.into(),
        })))
    }

    /// Update the fields present in the form; a new `image` replaces the current photo
    #[oai(path = "/update/:id", method = "put", tag = "StudentTags::Students")]
    async fn update(
        &self,
        req: &Request,
        auth: SessionAuth,
        id: Path<String>,
        form: StudentFormPayload,
    ) -> Result<Json<StudentEnvelope>, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        let (form, image) = form.into_parts();
        let image = read_upload(image).await.map_err(|e| self.fail(e))?;

        let student = self
            .student_coordinator
            .update(&ctx, &id.0, form, image)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(StudentEnvelope {
            message: "Student updated successfully".to_string(),
            data: student.into(),
        }))
    }

    #[oai(path = "/toggle-status/:id", method = "patch", tag = "StudentTags::Students")]
    async fn toggle_status(&self, req: &Request, auth: SessionAuth, id: Path<String>) -> Result<Json<StudentEnvelope>, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        let student = self
            .student_coordinator
            .toggle_status(&ctx, &id.0)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(StudentEnvelope {
            message: toggle_message("Student", student.is_active),
            data: student.into(),
        }))
    }

    /// Permanently delete a student and its photo
    #[oai(path = "/delete/:id", method = "delete", tag = "StudentTags::Students")]
    async fn delete(&self, req: &Request, auth: SessionAuth, id: Path<String>) -> Result<Json<MessageResponse>, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        self.student_coordinator
            .delete(&ctx, &id.0)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(MessageResponse::new("Student deleted permanently")))
    }

    #[oai(path = "/remove-image/:id", method = "delete", tag = "StudentTags::Students")]
    async fn remove_image(&self, req: &Request, auth: SessionAuth, id: Path<String>) -> Result<Json<StudentEnvelope>, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        let student = self
            .student_coordinator
            .remove_image(&ctx, &id.0)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(StudentEnvelope {
            message: "Image removed successfully".to_string(),
            data: student.into(),
        }))
    }

    /// Substring search on student id or registration number, at most 20 results
    #[oai(path = "/search", method = "get", tag = "StudentTags::Students")]
    async fn search(
        &self,
        req: &Request,
        auth: SessionAuth,
        query: Query<Option<String>>,
    ) -> Result<Json<StudentSearchResponse>, RegistryApiError> {
        self.admin_context(req, &auth).await?;
        let students = self
            .student_coordinator
            .search(query.0.as_deref().unwrap_or_default())
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(StudentSearchResponse {
            message: "Search completed".to_string(),
            count: students.len() as u64,
            data: students.into_iter().map(StudentResponse::from).collect(),
        }))
    }

    /// Exact lookup by student id or registration number among active students
    #[oai(path = "/public/search", method = "get", tag = "StudentTags::Verification")]
    async fn public_search(&self, query: Query<Option<String>>) -> Result<Json<PublicStudentEnvelope>, RegistryApiError> {
        let student = self
            .student_coordinator
            .public_search(query.0.as_deref().unwrap_or_default())
            .await
            .map_err(|e| self.fail(e))?
            .ok_or_else(|| RegistryApiError::not_found("Student not found or not active"))?;

        Ok(Json(PublicStudentEnvelope {
            message: "Student found".to_string(),
            data: student.into(),
        }))
    }

    /// Verification lookup by record id, used by certificate QR codes
    #[oai(path = "/:id", method = "get", tag = "StudentTags::Verification")]
    async fn get(&self, id: Path<String>) -> Result<Json<StudentDetailResponse>, RegistryApiError> {
        let detail = self
            .student_coordinator
            .get_public(&id.0)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(Json(detail.into()))
    }
}
