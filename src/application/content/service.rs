//! One CRUD service, instantiated per content type
//!
//! Visibility, validation of the record shape and file bookkeeping live here;
//! everything type-specific comes from the [`ContentResource`] impl.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::guards::DeleteGuard;
use crate::domain::{
    ContentRepository, ContentResource, DomainError, DomainResult, FileStore, Identity,
    RepositoryProvider, StoredFile, Upload,
};
use crate::shared::{PageRequest, PaginatedResult};

pub struct ContentService<R: ContentResource> {
    repos: Arc<dyn RepositoryProvider>,
    files: Arc<dyn FileStore>,
    guard: Option<Arc<dyn DeleteGuard<R>>>,
}

impl<R: ContentResource> ContentService<R> {
    pub fn new(repos: Arc<dyn RepositoryProvider>, files: Arc<dyn FileStore>) -> Self {
        Self {
            repos,
            files,
            guard: None,
        }
    }

    pub fn with_delete_guard(mut self, guard: Arc<dyn DeleteGuard<R>>) -> Self {
        self.guard = Some(guard);
        self
    }

    fn repo(&self) -> &dyn ContentRepository<R> {
        R::repository(self.repos.as_ref())
    }

    /// List items matching `filter`.
    ///
    /// Anonymous callers only ever see public items, whatever the filter says.
    pub async fn list(
        &self,
        mut filter: R::Filter,
        page: PageRequest,
        caller: Option<&Identity>,
    ) -> DomainResult<PaginatedResult<R>> {
        if caller.is_none() {
            if !R::PUBLIC_READ {
                return Err(DomainError::Unauthorized("Authentication required".into()));
            }
            R::restrict_to_public(&mut filter);
        }
        self.repo().list(&filter, page).await
    }

    pub async fn get_by_id(&self, id: &str, caller: Option<&Identity>) -> DomainResult<R> {
        if caller.is_none() && !R::PUBLIC_READ {
            return Err(DomainError::Unauthorized("Authentication required".into()));
        }

        let item = self.find(id).await?;
        if caller.is_none() && !item.is_public() {
            return Err(DomainError::Forbidden(format!(
                "{} {} is not published",
                R::ENTITY,
                id
            )));
        }
        Ok(item)
    }

    /// Store `file` (if any) and then the record pointing at it.
    pub async fn create(
        &self,
        draft: R::Draft,
        file: Option<Upload>,
        creator: &Identity,
    ) -> DomainResult<R> {
        let stored = self.store(file).await?;
        let public_path = stored.as_ref().map(|f| f.public_path.clone());

        let built = R::create(
            Uuid::new_v4().to_string(),
            draft,
            stored,
            &creator.user_id,
            Utc::now(),
        );
        let result = match built {
            Ok(item) => self.repo().insert(item).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(item) => {
                info!(entity = R::ENTITY, id = item.id(), user = %creator.username, "Created");
                Ok(item)
            }
            Err(e) => {
                self.discard(public_path.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Apply the supplied fields. A new file replaces the previous one, which
    /// is removed once the record points at the new path.
    pub async fn update(&self, id: &str, patch: R::Patch, file: Option<Upload>) -> DomainResult<R> {
        let mut item = self.find(id).await?;
        let previous = item.attachment().map(str::to_string);

        let stored = self.store(file).await?;
        let replaced = stored.as_ref().map(|f| f.public_path.clone());

        item.apply(patch, Utc::now());
        if let Some(stored) = stored {
            item.attach(stored);
        }

        let item = match self.repo().update(item).await {
            Ok(item) => item,
            Err(e) => {
                self.discard(replaced.as_deref()).await;
                return Err(e);
            }
        };

        if replaced.is_some() && previous != replaced {
            self.discard(previous.as_deref()).await;
        }

        info!(entity = R::ENTITY, id, "Updated");
        Ok(item)
    }

    /// Remove the record, then its file.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let item = self.find(id).await?;

        if let Some(guard) = &self.guard {
            guard.check(&item).await?;
        }

        if !self.repo().delete(id).await? {
            return Err(DomainError::not_found(R::ENTITY, id));
        }
        self.discard(item.attachment()).await;

        info!(entity = R::ENTITY, id, "Deleted");
        Ok(())
    }

    pub async fn count(&self) -> DomainResult<u64> {
        self.repo().count().await
    }

    async fn find(&self, id: &str) -> DomainResult<R> {
        self.repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(R::ENTITY, id))
    }

    async fn store(&self, file: Option<Upload>) -> DomainResult<Option<StoredFile>> {
        match file {
            Some(upload) => {
                let stored = self.files.save(upload).await?;
                debug!(entity = R::ENTITY, path = %stored.public_path, size = stored.size, "File stored");
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    /// Best-effort file removal; the record is the source of truth.
    async fn discard(&self, public_path: Option<&str>) {
        let Some(path) = public_path else {
            return;
        };
        if let Err(e) = self.files.remove(path).await {
            warn!(entity = R::ENTITY, path, "Failed to remove file: {}", e);
        }
    }
}
