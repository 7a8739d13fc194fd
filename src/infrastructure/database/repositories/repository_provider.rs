//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    ContentRepository, MediaAsset, News, RepositoryProvider, ScheduleEntry, UserRepository,
};

use super::media_repository::SeaOrmMediaRepository;
use super::news_repository::SeaOrmNewsRepository;
use super::schedule_repository::SeaOrmScheduleRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let admin = repos.users().find_by_username("admin").await?;
/// let published = repos.news().count().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    news: SeaOrmNewsRepository,
    schedules: SeaOrmScheduleRepository,
    media: SeaOrmMediaRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            news: SeaOrmNewsRepository::new(db.clone()),
            schedules: SeaOrmScheduleRepository::new(db.clone()),
            media: SeaOrmMediaRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn news(&self) -> &dyn ContentRepository<News> {
        &self.news
    }

    fn schedules(&self) -> &dyn ContentRepository<ScheduleEntry> {
        &self.schedules
    }

    fn media(&self) -> &dyn ContentRepository<MediaAsset> {
        &self.media
    }
}
