//! Media library domain entity

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::content::{ContentRepository, ContentResource, StoredFile};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    Image,
    Document,
    Video,
    #[default]
    Other,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [Self::Image, Self::Document, Self::Video, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Video => "video",
            Self::Other => "other",
        }
    }

    /// Classify an upload by its MIME type.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime == "application/pdf" {
            Self::Document
        } else {
            Self::Other
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown media type `{s}`"))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded file tracked in the media library
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub id: String,
    /// Generated name on disk
    pub filename: String,
    pub original_name: String,
    /// Public path, e.g. `/uploads/1700000000000-42.png`
    pub path: String,
    pub mime_type: String,
    pub size: u64,
    pub media_type: MediaType,
    pub description: String,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaDraft {
    pub description: Option<String>,
    /// Derived from the MIME type when absent
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaPatch {
    pub description: Option<String>,
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub media_type: Option<MediaType>,
}

impl ContentResource for MediaAsset {
    type Draft = MediaDraft;
    type Patch = MediaPatch;
    type Filter = MediaFilter;

    const ENTITY: &'static str = "Media";
    const DEFAULT_PAGE_SIZE: u64 = 20;
    const PUBLIC_READ: bool = false;

    fn repository(repos: &dyn RepositoryProvider) -> &dyn ContentRepository<Self> {
        repos.media()
    }

    fn create(
        id: String,
        draft: MediaDraft,
        file: Option<StoredFile>,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let file = file.ok_or_else(|| DomainError::invalid("file", "No file uploaded"))?;
        Ok(Self {
            id,
            media_type: draft
                .media_type
                .unwrap_or_else(|| MediaType::from_mime(&file.mime_type)),
            filename: file.filename,
            original_name: file.original_name,
            path: file.public_path,
            mime_type: file.mime_type,
            size: file.size,
            description: draft.description.unwrap_or_default(),
            uploaded_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: MediaPatch, now: DateTime<Utc>) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(media_type) = patch.media_type {
            self.media_type = media_type;
        }
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn is_public(&self) -> bool {
        false
    }

    fn restrict_to_public(_filter: &mut MediaFilter) {}

    fn matches(&self, filter: &MediaFilter) -> bool {
        filter.media_type.map_or(true, |t| t == self.media_type)
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }

    fn attachment(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn attach(&mut self, file: StoredFile) {
        self.filename = file.filename;
        self.original_name = file.original_name;
        self.path = file.public_path;
        self.mime_type = file.mime_type;
        self.size = file.size;
    }
}
