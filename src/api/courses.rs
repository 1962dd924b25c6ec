use std::sync::Arc;

use poem::Request;
use poem_openapi::{
    OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};

use crate::app_data::AppData;
use crate::coordinators::CourseCoordinator;
use crate::errors::api::ErrorExposure;
use crate::errors::{InternalError, RegistryApiError};
use crate::providers::{AccessGate, Requirement};
use crate::types::dto::common::{MessageResponse, PaginationMeta, toggle_message};
use crate::types::dto::course::{
    ActiveCoursesResponse, CourseEnvelope, CourseListResponse, CourseRequest, CourseResponse,
    CourseStatsResponse, CreateCourseApiResponse,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::course::CourseFilter;
use crate::types::internal::pagination::PageRequest;

use super::auth::SessionAuth;
use super::helpers::{filter_value, parse_bool_filter};

/// Course catalog endpoints
pub struct CoursesApi {
    course_coordinator: Arc<CourseCoordinator>,
    access_gate: Arc<AccessGate>,
    error_exposure: ErrorExposure,
}

impl CoursesApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            access_gate: app_data.access_gate.clone(),
            error_exposure: app_data.error_exposure,
            course_coordinator: Arc::new(CourseCoordinator::new(app_data)),
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

/// API tags for course endpoints
#[derive(Tags)]
enum CourseTags {
    /// Course catalog
    Courses,
}

#[OpenApi(prefix_path = "/courses")]
impl CoursesApi {
    /// Paginated course list for admins
    ///
    /// `search` matches name, code or description; `is_active` accepts `true`, `false` or `all`.
    #[oai(path = "/all", method = "get", tag = "CourseTags::Courses")]
    async fn list_all(
        &self,
        req: &Request,
        auth: SessionAuth,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
        search: Query<Option<String>>,
        is_active: Query<Option<String>>,
    ) -> Result<Json<CourseListResponse>, RegistryApiError> {
        self.admin_context(req, &auth).await?;

        let filter = CourseFilter {
            search: filter_value(search.0),
            is_active: parse_bool_filter("is_active", is_active.0).map_err(|e| self.fail(e))?,
        };
        let page = self
            .course_coordinator
            .list(&filter, PageRequest::new(page.0, limit.0))
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(CourseListResponse {
            pagination: PaginationMeta::from(&page),
            data: page.items.into_iter().map(CourseResponse::from).collect(),
        }))
    }

    /// Active courses, sorted by name
    #[oai(path = "/active", method = "get", tag = "CourseTags::Courses")]
    async fn list_active(&self) -> Result<Json<ActiveCoursesResponse>, RegistryApiError> {
        let courses = self
            .course_coordinator
            .list_active()
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(ActiveCoursesResponse {
            count: courses.len() as u64,
            data: courses.into_iter().map(CourseResponse::from).collect(),
        }))
    }

    /// Catalog totals and average duration
    #[oai(path = "/stats/summary", method = "get", tag = "CourseTags::Courses")]
    async fn stats(&self, req: &Request, auth: SessionAuth) -> Result<Json<CourseStatsResponse>, RegistryApiError> {
        self.admin_context(req, &auth).await?;
        let stats = self.course_coordinator.stats().await.map_err(|e| self.fail(e))?;
        Ok(Json(stats.into()))
    }

    #[oai(path = "/:id", method = "get", tag = "CourseTags::Courses")]
    async fn get(&self, id: Path<String>) -> Result<Json<CourseResponse>, RegistryApiError> {
        let course = self
            .course_coordinator
            .get(&id.0)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(Json(course.into()))
    }

    /// Create a course
    ///
    /// Duration may be sent nested as `duration: {value, unit}` or flat as
    /// `duration_value` / `duration_unit`.
    #[oai(path = "/create", method = "post", tag = "CourseTags::Courses")]
    async fn create(
        &self,
        req: &Request,
        auth: SessionAuth,
        body: Json<CourseRequest>,
    ) -> Result<CreateCourseApiResponse, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        let new_course = body.0.into_new_course().map_err(|e| self.fail(e))?;
        let course = self
            .course_coordinator
            .create(&ctx, new_course)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(CreateCourseApiResponse::Created(Json(CourseEnvelope {
            message: "Course created successfully".to_string(),
            data: course.into(),
        })))
    }

    /// Update the fields present in the body
    #[oai(path = "/update/:id", method = "put", tag = "CourseTags::Courses")]
    async fn update(
        &self,
        req: &Request,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<CourseRequest>,
    ) -> Result<Json<CourseEnvelope>, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        let changes = body.0.into_changes().map_err(|e| self.fail(e))?;
        let course = self
            .course_coordinator
            .update(&ctx, &id.0, changes)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(CourseEnvelope {
            message: "Course updated successfully".to_string(),
            data: course.into(),
        }))
    }

    #[oai(path = "/toggle-status/:id", method = "patch", tag = "CourseTags::Courses")]
    async fn toggle_status(&self, req: &Request, auth: SessionAuth, id: Path<String>) -> Result<Json<CourseEnvelope>, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        let course = self
            .course_coordinator
            .toggle_status(&ctx, &id.0)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(CourseEnvelope {
            message: toggle_message("Course", course.is_active),
            data: course.into(),
        }))
    }

    /// Permanently delete a course
    ///
    /// Students keep their course snapshot after the course is gone.
    #[oai(path = "/delete/:id", method = "delete", tag = "CourseTags::Courses")]
    async fn delete(&self, req: &Request, auth: SessionAuth, id: Path<String>) -> Result<Json<MessageResponse>, RegistryApiError> {
        let ctx = self.admin_context(req, &auth).await?;
        self.course_coordinator
            .delete(&ctx, &id.0)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(MessageResponse::new("Course deleted permanently")))
    }
}
