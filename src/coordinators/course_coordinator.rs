use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{RegistryError, UniqueField};
use crate::stores::CourseStore;
use crate::types::db::course;
use crate::types::internal::context::RequestContext;
use crate::types::internal::course::{CourseChanges, CourseFilter, CourseStats, NewCourse};
use crate::types::internal::pagination::{Page, PageRequest};

/// Coordinates course registry workflows
pub struct CourseCoordinator {
    course_store: Arc<CourseStore>,
}

fn conflict(field: UniqueField, course_name: &str, course_code: &str) -> InternalError {
    let value = match field {
        UniqueField::CourseCode => course_code,
        _ => course_name,
    };
    RegistryError::duplicate(field, value).into()
}

impl CourseCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            course_store: app_data.course_store.clone(),
        }
    }

    pub async fn list(
        &self,
        filter: &CourseFilter,
        page: PageRequest,
    ) -> Result<Page<course::Model>, InternalError> {
        self.course_store.list(filter, page).await
    }

    pub async fn list_active(&self) -> Result<Vec<course::Model>, InternalError> {
        self.course_store.list_active().await
    }

    pub async fn get(&self, id: &str) -> Result<course::Model, InternalError> {
        self.course_store.get(id).await
    }

    pub async fn stats(&self) -> Result<CourseStats, InternalError> {
        self.course_store.stats().await
    }

    /// Probe name then code, then insert
    ///
    /// The probe only produces the friendlier message; the unique indexes decide races.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        new_course: NewCourse,
    ) -> Result<course::Model, InternalError> {
        if let Some(field) = self
            .course_store
            .find_conflict(&new_course.course_name, &new_course.course_code, None)
            .await?
        {
            tracing::warn!(request_id = %ctx.request_id, "Course create rejected: {} taken", field.field_name());
            return Err(conflict(field, &new_course.course_name, &new_course.course_code));
        }

        let created = self.course_store.insert(new_course).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, "Course {} created", created.id);
        Ok(created)
    }

    /// Apply an update mask; duplicate probe excludes the course itself
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        changes: CourseChanges,
    ) -> Result<course::Model, InternalError> {
        let mut course = self.course_store.get(id).await?;
        let identity_changed = changes.course_name.is_set() || changes.course_code.is_set();
        changes.apply(&mut course)?;

        if identity_changed {
            if let Some(field) = self
                .course_store
                .find_conflict(&course.course_name, &course.course_code, Some(id))
                .await?
            {
                tracing::warn!(request_id = %ctx.request_id, "Course update rejected: {} taken", field.field_name());
                return Err(conflict(field, &course.course_name, &course.course_code));
            }
        }

        let saved = self.course_store.save(course).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, "Course {} updated", saved.id);
        Ok(saved)
    }

    pub async fn toggle_status(&self, ctx: &RequestContext, id: &str) -> Result<course::Model, InternalError> {
        let mut course = self.course_store.get(id).await?;
        course.is_active = !course.is_active;
        let saved = self.course_store.save(course).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            "Course {} is_active set to {}",
            saved.id,
            saved.is_active
        );
        Ok(saved)
    }

    /// Permanent delete; students keep their course snapshot and dangling reference
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), InternalError> {
        let course = self.course_store.get(id).await?;

        let referencing = self.course_store.count_referencing_students(&course.id).await?;
        if referencing > 0 {
            tracing::warn!(
                request_id = %ctx.request_id,
                "Deleting course {} still referenced by {} students",
                course.id,
                referencing
            );
        }

        self.course_store.delete(&course.id).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, "Course {} deleted", course.id);
        Ok(())
    }
}
