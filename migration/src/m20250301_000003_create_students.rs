use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key on course_id: deleting a course leaves its students in place.
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::StudentName).string().not_null())
                    .col(ColumnDef::new(Students::FathersName).string().not_null())
                    .col(ColumnDef::new(Students::StudentId).string().not_null())
                    .col(
                        ColumnDef::new(Students::StudentIdKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Students::RegistrationNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::RegistrationNumberKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::CourseId).string().not_null())
                    .col(ColumnDef::new(Students::CourseName).string().not_null())
                    .col(ColumnDef::new(Students::CourseCode).string().not_null())
                    .col(
                        ColumnDef::new(Students::CourseDurationValue)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::CourseDurationUnit)
                            .string()
                            .not_null()
                            .default("months"),
                    )
                    .col(ColumnDef::new(Students::Competency).string().not_null())
                    .col(ColumnDef::new(Students::Batch).string().not_null())
                    .col(
                        ColumnDef::new(Students::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Students::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Students::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Students::IssueDate).date().not_null())
                    .col(ColumnDef::new(Students::CompletionDate).date().null())
                    .col(
                        ColumnDef::new(Students::PhotoUrl)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Students::PhotoPublicId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Students::ContactNumber)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Students::Address)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_batch_status")
                    .table(Students::Table)
                    .col(Students::Batch)
                    .col(Students::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_course_id")
                    .table(Students::Table)
                    .col(Students::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_created_at")
                    .table(Students::Table)
                    .col(Students::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    StudentName,
    FathersName,
    StudentId,
    StudentIdKey,
    RegistrationNumber,
    RegistrationNumberKey,
    CourseId,
    CourseName,
    CourseCode,
    CourseDurationValue,
    CourseDurationUnit,
    Competency,
    Batch,
    Status,
    IsActive,
    IsVerified,
    IssueDate,
    CompletionDate,
    PhotoUrl,
    PhotoPublicId,
    ContactNumber,
    Email,
    Address,
    CreatedAt,
    UpdatedAt,
}
