//! In-memory repositories
//!
//! Ephemeral backend used by tests and by `storage.backend = "memory"`.
//! Everything is lost when the process exits.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    ContentRepository, ContentResource, DomainError, DomainResult, MediaAsset, News,
    RepositoryProvider, ScheduleEntry, User, UserRepository,
};
use crate::shared::{PageRequest, PaginatedResult};

// ── Content ─────────────────────────────────────────────────────

/// Generic store for any [`ContentResource`], keyed by id.
pub struct MemoryContentRepository<R> {
    items: DashMap<String, R>,
}

impl<R> MemoryContentRepository<R> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }
}

impl<R> Default for MemoryContentRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ContentResource> ContentRepository<R> for MemoryContentRepository<R> {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<R>> {
        Ok(self.items.get(id).map(|entry| entry.value().clone()))
    }

    async fn list(&self, filter: &R::Filter, page: PageRequest) -> DomainResult<PaginatedResult<R>> {
        let mut matched: Vec<R> = self
            .items
            .iter()
            .filter(|entry| entry.value().matches(filter))
            .map(|entry| entry.value().clone())
            .collect();
        matched.sort_by(R::display_order);

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .collect();

        Ok(PaginatedResult::new(items, total, page))
    }

    async fn insert(&self, item: R) -> DomainResult<R> {
        match self.items.entry(item.id().to_string()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "{} {} already exists",
                R::ENTITY,
                item.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(item.clone());
                Ok(item)
            }
        }
    }

    async fn update(&self, item: R) -> DomainResult<R> {
        match self.items.get_mut(item.id()) {
            Some(mut existing) => {
                *existing = item.clone();
                Ok(item)
            }
            None => Err(DomainError::not_found(R::ENTITY, item.id())),
        }
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        Ok(self.items.remove(id).is_some())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.items.len() as u64)
    }
}

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<String, User>,
    // Serializes the uniqueness check with the insert.
    write_lock: Mutex<()>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_by(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self.find_by(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self.find_by(|u| u.email == email))
    }

    async fn insert(&self, user: User) -> DomainResult<User> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| DomainError::Storage("user store lock poisoned".into()))?;

        let duplicate = self.find_by(|u| {
            u.id == user.id || u.username == user.username || u.email == user.email
        });
        if duplicate.is_some() {
            return Err(DomainError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        match self.users.get_mut(&user.id) {
            Some(mut existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(DomainError::not_found("User", user.id)),
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}

// ── Provider ────────────────────────────────────────────────────

/// [`RepositoryProvider`] over process memory.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    users: MemoryUserRepository,
    news: MemoryContentRepository<News>,
    schedules: MemoryContentRepository<ScheduleEntry>,
    media: MemoryContentRepository<MediaAsset>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::domain::{NewUser, NewsDraft, NewsFilter, UserRole};

    fn news(id: &str, day: u32, published: bool) -> News {
        let date = Utc.with_ymd_and_hms(2024, 4, day, 10, 0, 0).unwrap();
        News::create(
            id.into(),
            NewsDraft {
                title: format!("Post {id}"),
                content: "Body".into(),
                summary: "Summary".into(),
                publish_date: Some(date),
                is_published: Some(published),
                category: None,
            },
            None,
            "u1",
            date,
        )
        .unwrap()
    }

    fn user(id: &str, username: &str, email: &str) -> User {
        User::new(
            id.into(),
            NewUser {
                username: username.into(),
                password_hash: "hash".into(),
                name: username.into(),
                email: email.into(),
                role: UserRole::Editor,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn list_filters_sorts_and_paginates() {
        let repo = MemoryContentRepository::<News>::new();
        for (id, day, published) in [("a", 1, true), ("b", 3, false), ("c", 2, true), ("d", 4, true)] {
            repo.insert(news(id, day, published)).await.unwrap();
        }

        let filter = NewsFilter {
            is_published: Some(true),
            ..Default::default()
        };
        let first = repo
            .list(&filter, PageRequest::resolve(Some(1), Some(2), 10))
            .await
            .unwrap();
        let ids: Vec<&str> = first.items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c"]);
        assert_eq!(first.total, 3);
        assert_eq!(first.total_pages, 2);

        let second = repo
            .list(&filter, PageRequest::resolve(Some(2), Some(2), 10))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, "a");
    }

    #[tokio::test]
    async fn equal_dates_page_in_id_order() {
        let repo = MemoryContentRepository::<News>::new();
        for id in ["c", "a", "d", "b"] {
            repo.insert(news(id, 7, true)).await.unwrap();
        }

        let mut seen = Vec::new();
        for page in 1..=2 {
            let listed = repo
                .list(&NewsFilter::default(), PageRequest::resolve(Some(page), Some(2), 10))
                .await
                .unwrap();
            seen.extend(listed.items.into_iter().map(|n| n.id));
        }
        assert_eq!(seen, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let repo = MemoryContentRepository::<News>::new();
        repo.insert(news("a", 1, true)).await.unwrap();

        let listed = repo
            .list(&NewsFilter::default(), PageRequest::resolve(Some(u64::MAX), None, 10))
            .await
            .unwrap();
        assert!(listed.items.is_empty());
        assert_eq!(listed.total, 1);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let repo = MemoryContentRepository::<News>::new();
        let err = repo.update(news("ghost", 1, true)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_replaces_and_delete_reports_presence() {
        let repo = MemoryContentRepository::<News>::new();
        let mut item = repo.insert(news("a", 1, false)).await.unwrap();
        item.apply(
            crate::domain::NewsPatch {
                title: Some("Renamed".into()),
                ..Default::default()
            },
            item.created_at + Duration::minutes(1),
        );
        repo.update(item).await.unwrap();
        assert_eq!(repo.find_by_id("a").await.unwrap().unwrap().title, "Renamed");

        assert!(repo.delete("a").await.unwrap());
        assert!(!repo.delete("a").await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let repo = MemoryUserRepository::new();
        repo.insert(user("1", "mira", "mira@example.com")).await.unwrap();

        let same_name = repo.insert(user("2", "mira", "other@example.com")).await;
        assert!(matches!(same_name, Err(DomainError::Conflict(_))));

        let same_email = repo.insert(user("3", "leo", "mira@example.com")).await;
        assert!(matches!(same_email, Err(DomainError::Conflict(_))));

        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo
            .find_by_email("MIRA@example.com")
            .await
            .unwrap()
            .is_some());
    }
}
