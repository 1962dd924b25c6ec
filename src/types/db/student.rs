use sea_orm::entity::prelude::*;

use super::enums::{Competency, DurationUnit, StudentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub student_name: String,
    pub fathers_name: String,
    pub student_id: String,
    /// Lowercased `student_id`, carries the unique index
    #[sea_orm(unique)]
    pub student_id_key: String,
    pub registration_number: String,
    /// Lowercased `registration_number`, carries the unique index
    #[sea_orm(unique)]
    pub registration_number_key: String,

    // Course reference plus the snapshot taken when it was assigned
    pub course_id: String,
    pub course_name: String,
    pub course_code: String,
    pub course_duration_value: f64,
    pub course_duration_unit: DurationUnit,

    pub competency: Competency,
    pub batch: String,
    pub status: StudentStatus,
    pub is_active: bool,
    pub is_verified: bool,
    pub issue_date: Date,
    pub completion_date: Option<Date>,

    pub photo_url: String,
    pub photo_public_id: String,

    pub contact_number: String,
    pub email: String,
    pub address: String,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Media handle owned by this record, if any
    pub fn photo_handle(&self) -> Option<&str> {
        if self.photo_public_id.is_empty() {
            None
        } else {
            Some(&self.photo_public_id)
        }
    }
}
