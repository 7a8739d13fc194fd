use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

/// Persistence of back-office accounts.
///
/// `insert` reports a duplicate username or email as `DomainError::Conflict`;
/// `update` reports an unknown id as `DomainError::NotFound`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn insert(&self, user: User) -> DomainResult<User>;
    async fn update(&self, user: User) -> DomainResult<User>;

    async fn count(&self) -> DomainResult<u64>;
}
