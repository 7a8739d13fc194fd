//! Pre-delete checks for content records

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    ContentResource, DomainError, DomainResult, MediaAsset, NewsFilter, RepositoryProvider,
};
use crate::shared::PageRequest;

/// Veto the deletion of a record that is still needed elsewhere.
#[async_trait]
pub trait DeleteGuard<R: ContentResource>: Send + Sync {
    async fn check(&self, item: &R) -> DomainResult<()>;
}

/// Refuses to delete media that a news item still uses as its image or links
/// from its content.
pub struct MediaInUseGuard {
    repos: Arc<dyn RepositoryProvider>,
}

impl MediaInUseGuard {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl DeleteGuard<MediaAsset> for MediaInUseGuard {
    async fn check(&self, item: &MediaAsset) -> DomainResult<()> {
        let filter = NewsFilter {
            references: Some(item.path.clone()),
            ..Default::default()
        };
        let referencing = self
            .repos
            .news()
            .list(&filter, PageRequest { page: 1, limit: 1 })
            .await?;

        if referencing.total > 0 {
            return Err(DomainError::Conflict(format!(
                "Media is still used by {} news item(s)",
                referencing.total
            )));
        }
        Ok(())
    }
}
