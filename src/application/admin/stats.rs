use std::sync::Arc;

use crate::domain::{DomainResult, RepositoryProvider};

/// Record counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioStats {
    pub news_count: u64,
    pub schedule_count: u64,
    pub media_count: u64,
    pub user_count: u64,
}

pub struct StatsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StatsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn stats(&self) -> DomainResult<StudioStats> {
        let (news_count, schedule_count, media_count, user_count) = tokio::try_join!(
            self.repos.news().count(),
            self.repos.schedules().count(),
            self.repos.media().count(),
            self.repos.users().count(),
        )?;

        Ok(StudioStats {
            news_count,
            schedule_count,
            media_count,
            user_count,
        })
    }
}
