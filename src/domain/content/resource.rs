//! The contract every managed content type fulfils.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::{ContentRepository, StoredFile};
use crate::domain::{DomainResult, RepositoryProvider};

/// A content type served by the generic content service.
///
/// Implementors describe their create/patch/filter shapes, how the public
/// visibility predicate applies to them and where their file (if any) lives.
pub trait ContentResource: Clone + Send + Sync + Sized + 'static {
    /// Validated payload for creation.
    type Draft: Send;
    /// Partial update; `None` fields are left untouched.
    type Patch: Send;
    /// Recognized list filters.
    type Filter: Clone + Default + Send + Sync;

    /// Entity name used in errors and logs.
    const ENTITY: &'static str;
    const DEFAULT_PAGE_SIZE: u64;
    /// Whether anonymous callers may read public items at all.
    const PUBLIC_READ: bool;

    fn repository(repos: &dyn RepositoryProvider) -> &dyn ContentRepository<Self>;

    /// Build a new record. `file` is the already-stored upload, if any.
    fn create(
        id: String,
        draft: Self::Draft,
        file: Option<StoredFile>,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Self>;

    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn id(&self) -> &str;

    /// Visible to anonymous readers (published, active).
    fn is_public(&self) -> bool;

    /// Force a filter down to the public predicate.
    fn restrict_to_public(filter: &mut Self::Filter);

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Listing order.
    fn display_order(a: &Self, b: &Self) -> Ordering;

    /// Public path of the attached file.
    fn attachment(&self) -> Option<&str>;

    /// Point the record at a newly stored file.
    fn attach(&mut self, file: StoredFile);
}
