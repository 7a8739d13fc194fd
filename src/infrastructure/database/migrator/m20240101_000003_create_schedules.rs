//! Create schedules table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Schedules::Description).text().not_null())
                    .col(ColumnDef::new(Schedules::Instructor).string_len(255).not_null())
                    .col(ColumnDef::new(Schedules::Studio).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Schedules::Level)
                            .string_len(20)
                            .not_null()
                            .default("all"),
                    )
                    .col(ColumnDef::new(Schedules::DayOfWeek).integer().not_null())
                    .col(ColumnDef::new(Schedules::StartTime).string_len(5).not_null())
                    .col(ColumnDef::new(Schedules::EndTime).string_len(5).not_null())
                    .col(ColumnDef::new(Schedules::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Schedules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Schedules::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_day_start")
                    .table(Schedules::Table)
                    .col(Schedules::DayOfWeek)
                    .col(Schedules::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Schedules {
    Table,
    Id,
    Title,
    Description,
    Instructor,
    Studio,
    Level,
    DayOfWeek,
    StartTime,
    EndTime,
    Capacity,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
