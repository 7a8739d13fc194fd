pub mod content;
pub mod media;
pub mod news;
pub mod repositories;
pub mod schedule;
pub mod user;

// Re-export commonly used types
pub use content::{ContentRepository, ContentResource, FileStore, StoredFile, Upload};
pub use media::{MediaAsset, MediaDraft, MediaFilter, MediaPatch, MediaType};
pub use news::{News, NewsCategory, NewsDraft, NewsFilter, NewsPatch};
pub use repositories::{DomainResult, RepositoryProvider};
pub use schedule::{ClassLevel, ScheduleDraft, ScheduleEntry, ScheduleFilter, SchedulePatch};
pub use user::{Identity, NewUser, User, UserRepository, UserRole};

pub use crate::shared::types::errors::{DomainError, FieldError};
