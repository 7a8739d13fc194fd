//! Media DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::{DomainError, MediaAsset, MediaDraft, MediaFilter, MediaPatch, MediaType};
use crate::interfaces::http::common::UploadForm;
use crate::shared::validations::flexible;

fn validate_media_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<MediaType>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("media_type");
        error.message = Some("must be one of: image, document, video, other".into());
        error
    })
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaDto {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    /// Public URL path, e.g. `/uploads/1700000000000-42.png`
    pub path: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub media_type: String,
    pub description: String,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MediaAsset> for MediaDto {
    fn from(m: MediaAsset) -> Self {
        Self {
            id: m.id,
            filename: m.filename,
            original_name: m.original_name,
            path: m.path,
            mime_type: m.mime_type,
            size: m.size,
            media_type: m.media_type.to_string(),
            description: m.description,
            uploaded_by: m.uploaded_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Text fields of a multipart upload; the binary goes in the `file` part.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UploadMediaRequest {
    #[serde(default)]
    pub description: Option<String>,
    /// image, document, video or other; derived from the MIME type when omitted
    #[serde(rename = "type", default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_media_type"))]
    pub type_: Option<String>,
}

impl UploadForm for UploadMediaRequest {
    const FILE_FIELD: &'static str = "file";
}

impl UploadMediaRequest {
    pub fn into_draft(self) -> MediaDraft {
        MediaDraft {
            description: self.description.map(|d| d.trim().to_string()),
            media_type: self.type_.and_then(|t| t.parse().ok()),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMediaRequest {
    /// An empty string clears the description
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_media_type"))]
    pub type_: Option<String>,
}

impl UpdateMediaRequest {
    pub fn into_patch(self) -> MediaPatch {
        MediaPatch {
            description: self.description.map(|d| d.trim().to_string()),
            media_type: self.type_.and_then(|t| t.parse().ok()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MediaListQuery {
    #[serde(default, deserialize_with = "flexible::option_u64")]
    pub page: Option<u64>,
    /// Page size, 1-100 (default 20)
    #[serde(default, deserialize_with = "flexible::option_u64")]
    pub limit: Option<u64>,
    #[serde(rename = "type", default, deserialize_with = "flexible::option_text")]
    pub type_: Option<String>,
}

impl MediaListQuery {
    pub fn filter(&self) -> Result<MediaFilter, DomainError> {
        let media_type = self
            .type_
            .as_deref()
            .map(str::parse::<MediaType>)
            .transpose()
            .map_err(|e| DomainError::invalid("type", e))?;
        Ok(MediaFilter { media_type })
    }
}
