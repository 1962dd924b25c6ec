use std::sync::Arc;

use uuid::Uuid;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::RegistryError;
use crate::providers::{MediaLease, MediaStore, MediaUpload, delete_detached};
use crate::stores::{CourseStore, StudentStore};
use crate::types::db::student;
use crate::types::internal::Patch;
use crate::types::internal::context::RequestContext;
use crate::types::internal::pagination::{Page, PageRequest};
use crate::types::internal::student::{
    CourseSnapshot, StudentDetail, StudentFacets, StudentFilter, StudentForm, check_record,
};

/// Coordinates student registry workflows
///
/// Writes follow one sequence: validate the form, probe for duplicate identifiers,
/// resolve the course, upload the photo, validate the merged record, persist.
/// An uploaded photo is held in a [`MediaLease`] until the write commits, so every
/// failure after the upload deletes it again.
pub struct StudentCoordinator {
    student_store: Arc<StudentStore>,
    course_store: Arc<CourseStore>,
    media_store: Arc<dyn MediaStore>,
}

impl StudentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            student_store: app_data.student_store.clone(),
            course_store: app_data.course_store.clone(),
            media_store: app_data.media_store.clone(),
        }
    }

    async fn snapshot_for(&self, course_id: &str) -> Result<CourseSnapshot, InternalError> {
        let course = self
            .course_store
            .find_by_id(course_id)
            .await?
            .ok_or(RegistryError::InvalidCourse)?;
        Ok(CourseSnapshot::from(&course))
    }

    async fn reject_duplicates(
        &self,
        ctx: &RequestContext,
        student_id: &str,
        registration_number: &str,
        exclude_id: Option<&str>,
    ) -> Result<(), InternalError> {
        if let Some(duplicate) = self
            .student_store
            .find_conflict(student_id, registration_number, exclude_id)
            .await?
        {
            tracing::warn!(
                request_id = %ctx.request_id,
                "Student write rejected: {} {:?} taken",
                duplicate.field.field_name(),
                duplicate.value
            );
            return Err(RegistryError::Duplicate(duplicate).into());
        }
        Ok(())
    }

    async fn upload(&self, image: Option<MediaUpload>) -> Result<Option<MediaLease>, InternalError> {
        match image {
            Some(upload) => Ok(Some(
                MediaLease::acquire(self.media_store.clone(), upload).await?,
            )),
            None => Ok(None),
        }
    }

    /// Final validation and write; the lease is released on failure and committed on success
    async fn persist<F, Fut>(
        &self,
        lease: Option<MediaLease>,
        mut record: student::Model,
        write: F,
    ) -> Result<student::Model, InternalError>
    where
        F: FnOnce(student::Model) -> Fut,
        Fut: std::future::Future<Output = Result<student::Model, InternalError>>,
    {
        if let Some(lease) = &lease {
            record.photo_url = lease.asset().url.clone();
            record.photo_public_id = lease.asset().handle.clone();
        }

        let outcome = match check_record(&record) {
            Ok(()) => write(record).await,
            Err(e) => Err(e.into()),
        };

        match (outcome, lease) {
            (Ok(saved), Some(lease)) => {
                lease.commit();
                Ok(saved)
            }
            (Ok(saved), None) => Ok(saved),
            (Err(e), Some(lease)) => {
                lease.release().await;
                Err(e)
            }
            (Err(e), None) => Err(e),
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        form: StudentForm,
        image: Option<MediaUpload>,
    ) -> Result<student::Model, InternalError> {
        let new_student = form.into_new_student()?;
        self.reject_duplicates(
            ctx,
            &new_student.student_id,
            &new_student.registration_number,
            None,
        )
        .await?;

        let snapshot = self.snapshot_for(&new_student.course_id).await?;
        let record = new_student.into_record(Uuid::new_v4().to_string(), &snapshot);

        let lease = self.upload(image).await?;
        let store = self.student_store.clone();
        let created = self
            .persist(lease, record, |record| async move { store.insert(record).await })
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            "Student {} created",
            created.id
        );
        Ok(created)
    }

    /// Apply an update mask to a student
    ///
    /// The course snapshot is refreshed only when the course reference changes.
    /// A replaced photo is deleted after the new record is persisted.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        form: StudentForm,
        image: Option<MediaUpload>,
    ) -> Result<student::Model, InternalError> {
        let existing = self.student_store.get(id).await?;
        let mut changes = form.into_changes()?;
        let course_change = std::mem::take(&mut changes.course_id);
        let identifiers_changed = changes.student_id.is_set() || changes.registration_number.is_set();

        let mut record = existing.clone();
        changes.apply(&mut record);

        if identifiers_changed {
            self.reject_duplicates(ctx, &record.student_id, &record.registration_number, Some(id))
                .await?;
        }

        if let Patch::Set(course_id) = course_change {
            if course_id != existing.course_id {
                self.snapshot_for(&course_id).await?.apply_to(&mut record);
            }
        }

        let lease = self.upload(image).await?;
        let replaced_handle = lease
            .as_ref()
            .and_then(|_| existing.photo_handle().map(str::to_string));

        let store = self.student_store.clone();
        let saved = self
            .persist(lease, record, |record| async move { store.save(record).await })
            .await?;

        if let Some(handle) = replaced_handle {
            if let Err(e) = delete_detached(self.media_store.clone(), handle.clone()).await {
                tracing::error!(
                    request_id = %ctx.request_id,
                    "Replaced photo {} of student {} could not be deleted: {}",
                    handle,
                    saved.id,
                    e
                );
            }
        }

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            "Student {} updated",
            saved.id
        );
        Ok(saved)
    }

    pub async fn toggle_status(&self, ctx: &RequestContext, id: &str) -> Result<student::Model, InternalError> {
        let mut student = self.student_store.get(id).await?;
        student.is_active = !student.is_active;
        let saved = self.student_store.save(student).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            "Student {} is_active set to {}",
            saved.id,
            saved.is_active
        );
        Ok(saved)
    }

    /// Delete the photo first; the record is kept if the media host refuses
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), InternalError> {
        let student = self.student_store.get(id).await?;

        if let Some(handle) = student.photo_handle() {
            self.media_store.delete(handle).await.inspect_err(|e| {
                tracing::error!(
                    request_id = %ctx.request_id,
                    "Student {} kept: photo delete failed: {}",
                    student.id,
                    e
                )
            })?;
        }

        self.student_store.delete(&student.id).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, "Student {} deleted", student.id);
        Ok(())
    }

    /// Delete the photo and clear the photo fields
    pub async fn remove_image(&self, ctx: &RequestContext, id: &str) -> Result<student::Model, InternalError> {
        let mut student = self.student_store.get(id).await?;

        if let Some(handle) = student.photo_handle() {
            self.media_store.delete(handle).await?;
        }

        student.photo_url.clear();
        student.photo_public_id.clear();
        let saved = self.student_store.save(student).await?;

        tracing::info!(request_id = %ctx.request_id, "Photo removed from student {}", saved.id);
        Ok(saved)
    }

    /// Public verification lookup; inactive students are reported as missing
    pub async fn get_public(&self, id: &str) -> Result<StudentDetail, InternalError> {
        let student = self
            .student_store
            .find_by_id(id)
            .await?
            .filter(|s| s.is_active)
            .ok_or(RegistryError::StudentNotFound)?;

        let course = self.course_store.find_by_id(&student.course_id).await?;
        Ok(StudentDetail { student, course })
    }

    /// Exact identifier match among active students
    pub async fn public_search(&self, query: &str) -> Result<Option<student::Model>, InternalError> {
        if query.trim().is_empty() {
            return Err(RegistryError::EmptyQuery.into());
        }
        self.student_store.find_active_by_identifier(query).await
    }

    /// Admin substring search over identifiers
    pub async fn search(&self, query: &str) -> Result<Vec<student::Model>, InternalError> {
        if query.trim().is_empty() {
            return Err(RegistryError::EmptyQuery.into());
        }
        self.student_store.search_identifiers(query).await
    }

    pub async fn list(
        &self,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<(Page<student::Model>, StudentFacets), InternalError> {
        let (page, facets) = tokio::try_join!(
            self.student_store.list(filter, page),
            self.student_store.facets()
        )?;
        Ok((page, facets))
    }
}
