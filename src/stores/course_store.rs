use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::contains_literal;
use crate::errors::InternalError;
use crate::errors::internal::{RegistryError, UniqueField};
use crate::types::db::course::{self, ActiveModel, Entity as Course};
use crate::types::db::student;
use crate::types::internal::course::{CourseFilter, CourseStats, NewCourse, encode_tags};
use crate::types::internal::pagination::{Page, PageRequest};

/// Data access for the course registry
pub struct CourseStore {
    db: DatabaseConnection,
}

/// Map a unique violation raised by a course write onto the colliding field
fn map_write_error(err: InternalError, course: &course::Model) -> InternalError {
    match err.unique_violation().and_then(UniqueField::from_constraint_detail) {
        Some(UniqueField::CourseCode) => {
            RegistryError::duplicate(UniqueField::CourseCode, course.course_code.clone()).into()
        }
        Some(_) => RegistryError::duplicate(UniqueField::CourseName, course.course_name.clone()).into(),
        None => err,
    }
}

impl CourseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Report the first field (name, then code) already held by another course
    pub async fn find_conflict(
        &self,
        course_name: &str,
        course_code: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>, InternalError> {
        let probes = [
            (UniqueField::CourseName, course::Column::CourseName, course_name),
            (UniqueField::CourseCode, course::Column::CourseCode, course_code),
        ];

        for (field, column, value) in probes {
            let mut query = Course::find().filter(column.eq(value));
            if let Some(id) = exclude_id {
                query = query.filter(course::Column::Id.ne(id));
            }
            let taken = query
                .count(&self.db)
                .await
                .map_err(|e| InternalError::database("probe_course_conflict", e))?;
            if taken > 0 {
                return Ok(Some(field));
            }
        }

        Ok(None)
    }

    pub async fn insert(&self, new_course: NewCourse) -> Result<course::Model, InternalError> {
        let now = Utc::now().timestamp();
        let record = course::Model {
            id: Uuid::new_v4().to_string(),
            course_name: new_course.course_name,
            course_code: new_course.course_code,
            duration_value: new_course.duration.value,
            duration_unit: new_course.duration.unit,
            description: new_course.description,
            additional_info: encode_tags(&new_course.additional_info)?,
            is_active: new_course.is_active,
            created_at: now,
            updated_at: now,
        };

        let active: ActiveModel = record.clone().into_active_model();
        let created = active
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(InternalError::database("insert_course", e), &record))?;

        tracing::info!("Course {} ({}) created", created.id, created.course_code);
        Ok(created)
    }

    /// Persist every column of `course`, stamping `updated_at`
    pub async fn save(&self, mut course: course::Model) -> Result<course::Model, InternalError> {
        course.updated_at = Utc::now().timestamp();
        let active = course.clone().into_active_model().reset_all();

        active
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(InternalError::database("update_course", e), &course))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<course::Model>, InternalError> {
        Course::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_course", e))
    }

    pub async fn get(&self, id: &str) -> Result<course::Model, InternalError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::CourseNotFound.into())
    }

    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        let result = Course::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_course", e))?;

        if result.rows_affected == 0 {
            return Err(RegistryError::CourseNotFound.into());
        }
        Ok(())
    }

    /// Newest first, filtered and paginated
    pub async fn list(
        &self,
        filter: &CourseFilter,
        page: PageRequest,
    ) -> Result<Page<course::Model>, InternalError> {
        let mut query = Course::find();

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(course::Column::CourseName.like(contains_literal(term)))
                    .add(course::Column::CourseCode.like(contains_literal(term)))
                    .add(course::Column::Description.like(contains_literal(term))),
            );
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(course::Column::IsActive.eq(is_active));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_courses", e))?;

        let items = query
            .order_by_desc(course::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_courses", e))?;

        Ok(Page {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Active courses sorted by name
    pub async fn list_active(&self) -> Result<Vec<course::Model>, InternalError> {
        Course::find()
            .filter(course::Column::IsActive.eq(true))
            .order_by_asc(course::Column::CourseName)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_active_courses", e))
    }

    pub async fn count(&self, is_active: Option<bool>) -> Result<u64, InternalError> {
        let mut query = Course::find();
        if let Some(is_active) = is_active {
            query = query.filter(course::Column::IsActive.eq(is_active));
        }
        query
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_courses", e))
    }

    pub async fn stats(&self) -> Result<CourseStats, InternalError> {
        let durations: Vec<(f64, bool)> = Course::find()
            .select_only()
            .column(course::Column::DurationValue)
            .column(course::Column::IsActive)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("course_stats", e))?;

        let total = durations.len() as u64;
        let active = durations.iter().filter(|(_, is_active)| *is_active).count() as u64;
        let average_duration = (total > 0)
            .then(|| durations.iter().map(|(value, _)| value).sum::<f64>() / total as f64);

        Ok(CourseStats {
            total,
            active,
            inactive: total - active,
            average_duration,
        })
    }

    /// Number of student records whose course reference points at `course_id`
    pub async fn count_referencing_students(&self, course_id: &str) -> Result<u64, InternalError> {
        student::Entity::find()
            .filter(student::Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_course_students", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::DurationUnit;
    use crate::types::internal::course::{AdditionalInfoTag, CourseDuration};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> CourseStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        CourseStore::new(db)
    }

    fn new_course(name: &str, code: &str, value: f64, is_active: bool) -> NewCourse {
        NewCourse {
            course_name: name.to_string(),
            course_code: code.to_string(),
            duration: CourseDuration {
                value,
                unit: DurationUnit::Months,
            },
            description: format!("{} description", name),
            additional_info: vec![AdditionalInfoTag::Nsda],
            is_active,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = setup_test_db().await;
        let created = store
            .insert(new_course("Food Safety L1", "FS1", 6.0, true))
            .await
            .unwrap();

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched.course_code, "FS1");
        assert_eq!(fetched.additional_info, r#"["nsda"]"#);

        let missing = store.get("nope").await.unwrap_err();
        assert!(matches!(
            missing,
            InternalError::Registry(RegistryError::CourseNotFound)
        ));
    }

    #[tokio::test]
    async fn test_conflict_probe_checks_name_then_code() {
        let store = setup_test_db().await;
        let existing = store
            .insert(new_course("Food Safety L1", "FS1", 6.0, true))
            .await
            .unwrap();

        assert_eq!(
            store.find_conflict("Food Safety L1", "FS1", None).await.unwrap(),
            Some(UniqueField::CourseName)
        );
        assert_eq!(
            store.find_conflict("Other", "FS1", None).await.unwrap(),
            Some(UniqueField::CourseCode)
        );
        assert_eq!(
            store
                .find_conflict("Food Safety L1", "FS1", Some(&existing.id))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_storage_constraint_maps_to_duplicate() {
        let store = setup_test_db().await;
        store
            .insert(new_course("Food Safety L1", "FS1", 6.0, true))
            .await
            .unwrap();

        let err = store
            .insert(new_course("Food Safety L2", "FS1", 6.0, true))
            .await
            .unwrap_err();
        match err {
            InternalError::Registry(RegistryError::Duplicate(key)) => {
                assert_eq!(key.field, UniqueField::CourseCode)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_search_filter_and_pagination() {
        let store = setup_test_db().await;
        store.insert(new_course("Food Safety L1", "FS1", 6.0, true)).await.unwrap();
        store.insert(new_course("Food Safety L2", "FS2", 6.0, false)).await.unwrap();
        store.insert(new_course("Barista", "BR1", 3.0, true)).await.unwrap();

        let filter = CourseFilter {
            search: Some("food".to_string()),
            is_active: None,
        };
        let page = store.list(&filter, PageRequest::new(Some(1), Some(1))).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages(), 2);

        let active_only = CourseFilter {
            search: None,
            is_active: Some(true),
        };
        let page = store.list(&active_only, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);

        let active = store.list_active().await.unwrap();
        let names: Vec<_> = active.iter().map(|c| c.course_name.as_str()).collect();
        assert_eq!(names, vec!["Barista", "Food Safety L1"]);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let store = setup_test_db().await;
        store.insert(new_course("Food Safety L1", "FS1", 6.0, true)).await.unwrap();
        store.insert(new_course("Barista 100%", "BR_1", 3.0, true)).await.unwrap();

        let search = |term: &str| CourseFilter {
            search: Some(term.to_string()),
            is_active: None,
        };
        let page = store.list(&search("%"), PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].course_name, "Barista 100%");

        let page = store.list(&search("_"), PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].course_code, "BR_1");

        let page = store.list(&search("safety"), PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_stats() {
        let store = setup_test_db().await;
        assert_eq!(store.stats().await.unwrap().average_duration, None);

        store.insert(new_course("A", "A1", 6.0, true)).await.unwrap();
        store.insert(new_course("B", "B1", 3.0, false)).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.average_duration, Some(4.5));
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let store = setup_test_db().await;
        let mut course = store.insert(new_course("A", "A1", 6.0, true)).await.unwrap();
        course.is_active = false;
        let saved = store.save(course).await.unwrap();
        assert!(!saved.is_active);

        store.delete(&saved.id).await.unwrap();
        assert!(store.find_by_id(&saved.id).await.unwrap().is_none());
        assert!(store.delete(&saved.id).await.is_err());
    }
}
