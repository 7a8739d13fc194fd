//! Create news table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(News::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(News::Title).string_len(200).not_null())
                    .col(ColumnDef::new(News::Content).text().not_null())
                    .col(ColumnDef::new(News::Summary).string_len(500).not_null())
                    .col(ColumnDef::new(News::Image).string().null())
                    .col(
                        ColumnDef::new(News::PublishDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(News::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(News::Category)
                            .string_len(20)
                            .not_null()
                            .default("announcement"),
                    )
                    .col(ColumnDef::new(News::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(News::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(News::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Public listing filters on the flag and sorts by date
        manager
            .create_index(
                Index::create()
                    .name("idx_news_published_date")
                    .table(News::Table)
                    .col(News::IsPublished)
                    .col(News::PublishDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum News {
    Table,
    Id,
    Title,
    Content,
    Summary,
    Image,
    PublishDate,
    IsPublished,
    Category,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
