//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_news;
mod m20240101_000003_create_schedules;
mod m20240101_000004_create_media;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_news::Migration),
            Box::new(m20240101_000003_create_schedules::Migration),
            Box::new(m20240101_000004_create_media::Migration),
        ]
    }
}
