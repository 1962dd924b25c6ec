use sea_orm::entity::prelude::*;

use super::enums::DurationUnit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub course_name: String,
    #[sea_orm(unique)]
    pub course_code: String,
    pub duration_value: f64,
    pub duration_unit: DurationUnit,
    pub description: String,
    /// JSON array of additional info tags
    pub additional_info: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
