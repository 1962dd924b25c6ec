use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use super::contains_literal;
use crate::errors::InternalError;
use crate::errors::internal::{DuplicateKey, RegistryError, UniqueField};
use crate::types::db::student::{self, Entity as Student};
use crate::types::db::{Competency, StudentStatus};
use crate::types::internal::dashboard::{Bucket, RecentStudent, StudentTotals};
use crate::types::internal::pagination::{Page, PageRequest};
use crate::types::internal::student::{FacetCourse, StudentFacets, StudentFilter, identifier_key};

/// Upper bound on admin identifier search results
pub const SEARCH_LIMIT: u64 = 20;

/// Statuses counted as active on the dashboard
const ACTIVE_STATUSES: [StudentStatus; 2] = [StudentStatus::Active, StudentStatus::OnLeave];

/// Data access for the student registry
pub struct StudentStore {
    db: DatabaseConnection,
}

/// Map a unique violation raised by a student write onto the colliding identifier
fn map_write_error(err: InternalError, record: &student::Model) -> InternalError {
    match err.unique_violation().and_then(UniqueField::from_constraint_detail) {
        Some(UniqueField::RegistrationNumber) => RegistryError::duplicate(
            UniqueField::RegistrationNumber,
            record.registration_number.clone(),
        )
        .into(),
        Some(_) => RegistryError::duplicate(UniqueField::StudentId, record.student_id.clone()).into(),
        None => err,
    }
}

fn apply_filter(mut query: Select<Student>, filter: &StudentFilter) -> Select<Student> {
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(student::Column::StudentName.like(contains_literal(term)))
                .add(student::Column::StudentId.like(contains_literal(term)))
                .add(student::Column::RegistrationNumber.like(contains_literal(term)))
                .add(student::Column::FathersName.like(contains_literal(term)))
                .add(student::Column::Email.like(contains_literal(term)))
                .add(student::Column::ContactNumber.like(contains_literal(term))),
        );
    }
    if let Some(status) = filter.status {
        query = query.filter(student::Column::Status.eq(status));
    }
    if let Some(batch) = &filter.batch {
        query = query.filter(student::Column::Batch.eq(batch.as_str()));
    }
    if let Some(course_id) = &filter.course_id {
        query = query.filter(student::Column::CourseId.eq(course_id.as_str()));
    }
    if let Some(competency) = filter.competency {
        query = query.filter(student::Column::Competency.eq(competency));
    }
    if let Some(is_active) = filter.is_active {
        query = query.filter(student::Column::IsActive.eq(is_active));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(student::Column::IssueDate.gte(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(student::Column::IssueDate.lte(to));
    }
    query
}

/// Sorted distinct non-blank values
fn distinct_sorted(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl StudentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Report the first identifier (student id, then registration number) held by another student
    ///
    /// Comparison is case-insensitive through the normalized key columns.
    pub async fn find_conflict(
        &self,
        student_id: &str,
        registration_number: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<DuplicateKey>, InternalError> {
        let probes = [
            (UniqueField::StudentId, student::Column::StudentIdKey, student_id),
            (
                UniqueField::RegistrationNumber,
                student::Column::RegistrationNumberKey,
                registration_number,
            ),
        ];

        for (field, column, value) in probes {
            let mut query = Student::find().filter(column.eq(identifier_key(value)));
            if let Some(id) = exclude_id {
                query = query.filter(student::Column::Id.ne(id));
            }
            let taken = query
                .count(&self.db)
                .await
                .map_err(|e| InternalError::database("probe_student_conflict", e))?;
            if taken > 0 {
                return Ok(Some(DuplicateKey {
                    field,
                    value: value.to_string(),
                }));
            }
        }

        Ok(None)
    }

    pub async fn insert(&self, mut record: student::Model) -> Result<student::Model, InternalError> {
        let now = Utc::now().timestamp();
        record.created_at = now;
        record.updated_at = now;

        let created = record
            .clone()
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(InternalError::database("insert_student", e), &record))?;

        tracing::info!("Student {} ({}) created", created.id, created.student_id);
        Ok(created)
    }

    /// Persist every column of `record`, stamping `updated_at`
    pub async fn save(&self, mut record: student::Model) -> Result<student::Model, InternalError> {
        record.updated_at = Utc::now().timestamp();

        record
            .clone()
            .into_active_model()
            .reset_all()
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(InternalError::database("update_student", e), &record))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<student::Model>, InternalError> {
        Student::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_student", e))
    }

    pub async fn get(&self, id: &str) -> Result<student::Model, InternalError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::StudentNotFound.into())
    }

    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        let result = Student::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_student", e))?;

        if result.rows_affected == 0 {
            return Err(RegistryError::StudentNotFound.into());
        }
        Ok(())
    }

    /// Newest first, filtered and paginated
    pub async fn list(
        &self,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<Page<student::Model>, InternalError> {
        let query = apply_filter(Student::find(), filter);

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_students", e))?;

        let items = query
            .order_by_desc(student::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_students", e))?;

        Ok(Page {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn distinct_column(&self, column: student::Column) -> Result<Vec<String>, InternalError> {
        let values: Vec<String> = Student::find()
            .select_only()
            .column(column)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("student_facets", e))?;
        Ok(distinct_sorted(values))
    }

    /// Distinct filter values across all students
    pub async fn facets(&self) -> Result<StudentFacets, InternalError> {
        let batches = self.distinct_column(student::Column::Batch).await?;
        let statuses = self.distinct_column(student::Column::Status).await?;
        let competencies = self.distinct_column(student::Column::Competency).await?;

        let pairs: Vec<(String, String)> = Student::find()
            .select_only()
            .column(student::Column::CourseId)
            .column(student::Column::CourseName)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("student_facets", e))?;

        let mut courses: Vec<FacetCourse> = pairs
            .into_iter()
            .filter(|(id, name)| !id.trim().is_empty() && !name.trim().is_empty())
            .map(|(id, name)| FacetCourse { id, name })
            .collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        courses.dedup_by(|a, b| a.id == b.id);

        Ok(StudentFacets {
            batches,
            courses,
            statuses,
            competencies,
        })
    }

    /// Substring match on student id or registration number, newest first
    pub async fn search_identifiers(&self, query: &str) -> Result<Vec<student::Model>, InternalError> {
        let term = identifier_key(query);
        Student::find()
            .filter(
                Condition::any()
                    .add(student::Column::StudentIdKey.like(contains_literal(&term)))
                    .add(student::Column::RegistrationNumberKey.like(contains_literal(&term))),
            )
            .order_by_desc(student::Column::CreatedAt)
            .limit(SEARCH_LIMIT)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("search_students", e))
    }

    /// Exact case-insensitive identifier lookup among active students
    pub async fn find_active_by_identifier(
        &self,
        query: &str,
    ) -> Result<Option<student::Model>, InternalError> {
        let key = identifier_key(query);
        Student::find()
            .filter(student::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(student::Column::StudentIdKey.eq(key.as_str()))
                    .add(student::Column::RegistrationNumberKey.eq(key.as_str())),
            )
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("public_student_lookup", e))
    }

    pub async fn totals(&self) -> Result<StudentTotals, InternalError> {
        let total = Student::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_students", e))?;

        let active = Student::find()
            .filter(student::Column::IsActive.eq(true))
            .filter(student::Column::Status.is_in(ACTIVE_STATUSES))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_active_students", e))?;

        let completed = Student::find()
            .filter(student::Column::Status.eq(StudentStatus::Completed))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_completed_students", e))?;

        Ok(StudentTotals {
            total,
            active,
            completed,
        })
    }

    /// Creation timestamps falling in `[from, to)`
    pub async fn created_between(&self, from: i64, to: i64) -> Result<Vec<i64>, InternalError> {
        Student::find()
            .select_only()
            .column(student::Column::CreatedAt)
            .filter(student::Column::CreatedAt.gte(from))
            .filter(student::Column::CreatedAt.lt(to))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("student_registrations", e))
    }

    /// Student counts grouped by `column`, largest first, blank groups dropped
    pub async fn group_counts(
        &self,
        column: student::Column,
        top: Option<usize>,
    ) -> Result<Vec<Bucket>, InternalError> {
        let rows: Vec<(String, i64)> = Student::find()
            .select_only()
            .column(column)
            .column_as(Expr::col(student::Column::Id).count(), "count")
            .group_by(column)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("student_group_counts", e))?;

        let mut buckets: Vec<Bucket> = rows
            .into_iter()
            .filter(|(label, _)| !label.trim().is_empty())
            .map(|(label, count)| Bucket {
                label,
                count: count.max(0) as u64,
            })
            .collect();
        buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        if let Some(top) = top {
            buckets.truncate(top);
        }
        Ok(buckets)
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<RecentStudent>, InternalError> {
        let rows: Vec<(String, String, String, StudentStatus, Competency, i64)> = Student::find()
            .select_only()
            .column(student::Column::Id)
            .column(student::Column::StudentName)
            .column(student::Column::StudentId)
            .column(student::Column::Status)
            .column(student::Column::Competency)
            .column(student::Column::CreatedAt)
            .order_by_desc(student::Column::CreatedAt)
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("recent_students", e))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, student_name, student_id, status, competency, created_at)| RecentStudent {
                    id,
                    student_name,
                    student_id,
                    status,
                    competency,
                    created_at,
                },
            )
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::DurationUnit;
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use uuid::Uuid;

    async fn setup_test_db() -> StudentStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        StudentStore::new(db)
    }

    fn record(student_id: &str, registration_number: &str) -> student::Model {
        student::Model {
            id: Uuid::new_v4().to_string(),
            student_name: "Amina Rahman".into(),
            fathers_name: "Karim Rahman".into(),
            student_id: student_id.into(),
            student_id_key: identifier_key(student_id),
            registration_number: registration_number.into(),
            registration_number_key: identifier_key(registration_number),
            course_id: "course-1".into(),
            course_name: "Food Safety L1".into(),
            course_code: "FS1".into(),
            course_duration_value: 6.0,
            course_duration_unit: DurationUnit::Months,
            competency: Competency::Competent,
            batch: "B-01".into(),
            status: StudentStatus::Active,
            is_active: true,
            is_verified: false,
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            completion_date: None,
            photo_url: String::new(),
            photo_public_id: String::new(),
            contact_number: "0123".into(),
            email: "amina@example.com".into(),
            address: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_conflict_probe_is_case_insensitive_and_excludes_self() {
        let store = setup_test_db().await;
        let existing = store.insert(record("STU-1", "REG-1")).await.unwrap();

        let conflict = store.find_conflict("stu-1", "REG-9", None).await.unwrap();
        assert_eq!(conflict.map(|c| c.field), Some(UniqueField::StudentId));

        let conflict = store.find_conflict("STU-9", "reg-1", None).await.unwrap();
        assert_eq!(conflict.map(|c| c.field), Some(UniqueField::RegistrationNumber));

        let conflict = store
            .find_conflict("STU-1", "REG-1", Some(&existing.id))
            .await
            .unwrap();
        assert!(conflict.is_none());
    }

    #[tokio::test]
    async fn test_storage_constraint_maps_to_duplicate() {
        let store = setup_test_db().await;
        store.insert(record("STU-1", "REG-1")).await.unwrap();

        let err = store.insert(record("stu-1", "REG-2")).await.unwrap_err();
        match err {
            InternalError::Registry(RegistryError::Duplicate(key)) => {
                assert_eq!(key.field, UniqueField::StudentId);
                assert_eq!(key.value, "stu-1");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = store.insert(record("STU-2", "reg-1")).await.unwrap_err();
        assert!(matches!(
            err,
            InternalError::Registry(RegistryError::Duplicate(DuplicateKey {
                field: UniqueField::RegistrationNumber,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_and_facets() {
        let store = setup_test_db().await;
        store.insert(record("STU-1", "REG-1")).await.unwrap();
        let mut other = record("STU-2", "REG-2");
        other.batch = "B-02".into();
        other.status = StudentStatus::Completed;
        other.student_name = "Rafiq Islam".into();
        store.insert(other).await.unwrap();
        let mut blank_batch = record("STU-3", "REG-3");
        blank_batch.batch = String::new();
        blank_batch.is_active = false;
        store.insert(blank_batch).await.unwrap();

        let filter = StudentFilter {
            search: Some("rafiq".into()),
            ..Default::default()
        };
        let page = store.list(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].student_id, "STU-2");

        let filter = StudentFilter {
            is_active: Some(true),
            status: Some(StudentStatus::Active),
            ..Default::default()
        };
        assert_eq!(store.list(&filter, PageRequest::default()).await.unwrap().total, 1);

        let facets = store.facets().await.unwrap();
        assert_eq!(facets.batches, vec!["B-01", "B-02"]);
        assert_eq!(facets.statuses, vec!["active", "completed"]);
        assert_eq!(facets.courses.len(), 1);
    }

    #[tokio::test]
    async fn test_public_lookup_ignores_inactive() {
        let store = setup_test_db().await;
        store.insert(record("STU-1", "REG-1")).await.unwrap();
        let mut inactive = record("STU-2", "REG-2");
        inactive.is_active = false;
        store.insert(inactive).await.unwrap();

        assert!(store.find_active_by_identifier("stu-1").await.unwrap().is_some());
        assert!(store.find_active_by_identifier("Reg-1").await.unwrap().is_some());
        assert!(store.find_active_by_identifier("STU").await.unwrap().is_none());
        assert!(store.find_active_by_identifier("STU-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_search_is_substring() {
        let store = setup_test_db().await;
        store.insert(record("STU-1", "REG-1")).await.unwrap();
        store.insert(record("STU-2", "REG-2")).await.unwrap();

        assert_eq!(store.search_identifiers("stu").await.unwrap().len(), 2);
        assert_eq!(store.search_identifiers("reg-2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_totals_and_group_counts() {
        let store = setup_test_db().await;
        store.insert(record("STU-1", "REG-1")).await.unwrap();
        let mut on_leave = record("STU-2", "REG-2");
        on_leave.status = StudentStatus::OnLeave;
        store.insert(on_leave).await.unwrap();
        let mut completed = record("STU-3", "REG-3");
        completed.status = StudentStatus::Completed;
        completed.batch = "B-02".into();
        store.insert(completed).await.unwrap();

        let totals = store.totals().await.unwrap();
        assert_eq!(totals, StudentTotals { total: 3, active: 2, completed: 1 });

        let batches = store.group_counts(student::Column::Batch, Some(1)).await.unwrap();
        assert_eq!(batches, vec![Bucket { label: "B-01".into(), count: 2 }]);

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 3);
    }
}
