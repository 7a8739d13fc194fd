//! Uploaded files attached to content records.

use async_trait::async_trait;

use crate::domain::DomainResult;

/// A file received from a client, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A file persisted by a [`FileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated name on disk
    pub filename: String,
    pub original_name: String,
    /// Path under which the file is served, e.g. `/uploads/1700000000000-42.png`
    pub public_path: String,
    pub mime_type: String,
    pub size: u64,
}

/// Storage for uploaded binaries.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Validate and persist an upload.
    ///
    /// Fails with `Validation` for a disallowed MIME type and with
    /// `PayloadTooLarge` above the configured size.
    async fn save(&self, upload: Upload) -> DomainResult<StoredFile>;

    /// Delete the file behind a public path. A missing file is not an error.
    async fn remove(&self, public_path: &str) -> DomainResult<()>;
}
