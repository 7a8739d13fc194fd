//! Local file-system store for uploaded files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use crate::domain::{DomainError, DomainResult, FileStore, StoredFile, Upload};
use crate::shared::InfraError;

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// MIME types accepted for upload: common images, PDF, Word and Excel.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Writes uploads into a single directory under generated unique names.
pub struct LocalFileStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl LocalFileStore {
    /// Create the store, making sure the directory exists.
    pub async fn open(dir: impl Into<PathBuf>, max_bytes: u64) -> Result<Self, InfraError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        info!("Upload directory: {}", dir.display());
        Ok(Self { dir, max_bytes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Map a public path to its file on disk. Only the basename is used, so
    /// nothing outside the upload directory can be addressed.
    fn disk_path(&self, public_path: &str) -> Option<PathBuf> {
        let name = Path::new(public_path).file_name()?.to_str()?;
        Some(self.dir.join(name))
    }
}

/// `<unix-millis>-<random>[.ext]`, keeping the original extension.
fn unique_name(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let stem = format!("{}-{}", Utc::now().timestamp_millis(), suffix);
    match extension_of(original_name) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

fn extension_of(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, upload: Upload) -> DomainResult<StoredFile> {
        if !ALLOWED_MIME_TYPES.contains(&upload.content_type.as_str()) {
            return Err(DomainError::invalid(
                "file",
                format!("File type not allowed: {}", upload.content_type),
            ));
        }
        let size = upload.bytes.len() as u64;
        if size > self.max_bytes {
            return Err(DomainError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        let filename = unique_name(&upload.original_name);
        tokio::fs::write(self.dir.join(&filename), &upload.bytes)
            .await
            .map_err(InfraError::from)?;
        debug!(filename = %filename, size, "Stored upload");

        Ok(StoredFile {
            public_path: format!("{PUBLIC_PREFIX}/{filename}"),
            filename,
            original_name: upload.original_name,
            mime_type: upload.content_type,
            size,
        })
    }

    async fn remove(&self, public_path: &str) -> DomainResult<()> {
        let Some(path) = self.disk_path(public_path) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Upload already gone");
                Ok(())
            }
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}
