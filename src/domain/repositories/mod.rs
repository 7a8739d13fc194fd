//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::content::ContentRepository;
use super::media::MediaAsset;
use super::news::News;
use super::schedule::ScheduleEntry;
use super::user::UserRepository;

pub use crate::shared::types::errors::DomainResult;

/// Provides access to all domain repositories.
///
/// Two implementations exist: one over SeaORM and one purely in memory.
/// The backend is picked once at startup and passed around as
/// `Arc<dyn RepositoryProvider>`.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().find_by_username("admin").await?;
///     let total = repos.news().count().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn news(&self) -> &dyn ContentRepository<News>;
    fn schedules(&self) -> &dyn ContentRepository<ScheduleEntry>;
    fn media(&self) -> &dyn ContentRepository<MediaAsset>;
}
