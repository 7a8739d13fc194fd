use async_trait::async_trait;

use super::ContentResource;
use crate::domain::DomainResult;
use crate::shared::{PageRequest, PaginatedResult};

/// Persistence for one content type.
#[async_trait]
pub trait ContentRepository<R: ContentResource>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<R>>;

    /// Items matching `filter` in display order, one page at a time.
    async fn list(&self, filter: &R::Filter, page: PageRequest) -> DomainResult<PaginatedResult<R>>;

    async fn insert(&self, item: R) -> DomainResult<R>;

    /// Replace a stored item. Unknown ids fail with `NotFound`.
    async fn update(&self, item: R) -> DomainResult<R>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &str) -> DomainResult<bool>;

    async fn count(&self) -> DomainResult<u64>;
}
