//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod media_repository;
pub mod news_repository;
pub mod repository_provider;
pub mod schedule_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;
use crate::shared::InfraError;

fn db_err(e: DbErr) -> DomainError {
    InfraError::Database(e).into()
}

/// Map a write error, turning unique-constraint violations into `Conflict`.
fn write_err(e: DbErr, conflict: &str) -> DomainError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        DomainError::Conflict(conflict.to_string())
    } else {
        db_err(e)
    }
}

/// Map an update error, turning a missing row into `NotFound`.
fn update_err(e: DbErr, entity: &'static str, id: &str) -> DomainError {
    match e {
        DbErr::RecordNotUpdated => DomainError::not_found(entity, id),
        other => db_err(other),
    }
}
