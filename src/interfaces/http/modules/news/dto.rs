//! News DTOs
//!
//! Create and update bodies arrive as JSON or as multipart form fields, so
//! scalar fields go through the lenient deserializers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::news::parse_publish_date;
use crate::domain::{DomainError, News, NewsCategory, NewsDraft, NewsFilter, NewsPatch};
use crate::interfaces::http::common::UploadForm;
use crate::shared::validations::{flexible, validate_not_blank};

fn validate_publish_date(value: &str) -> Result<(), ValidationError> {
    match parse_publish_date(value) {
        Some(_) => Ok(()),
        None => {
            let mut error = ValidationError::new("date");
            error.message = Some("must be an RFC 3339 timestamp or YYYY-MM-DD".into());
            Err(error)
        }
    }
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    value.parse::<NewsCategory>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("category");
        error.message =
            Some("must be one of: announcement, event, performance, other".into());
        error
    })
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    /// Public path of the cover image
    pub image: Option<String>,
    pub publish_date: DateTime<Utc>,
    pub is_published: bool,
    pub category: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<News> for NewsDto {
    fn from(n: News) -> Self {
        Self {
            id: n.id,
            title: n.title,
            content: n.content,
            summary: n.summary,
            image: n.image,
            publish_date: n.publish_date,
            is_published: n.is_published,
            category: n.category.to_string(),
            created_by: n.created_by,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

/// New news post. Sent as JSON, or as multipart fields with an optional
/// `image` file part.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 500, message = "must be at most 500 characters")
    )]
    pub summary: String,
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_publish_date"))]
    pub publish_date: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_bool")]
    pub is_published: Option<bool>,
    /// announcement (default), event, performance or other
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
}

impl UploadForm for CreateNewsRequest {
    const FILE_FIELD: &'static str = "image";
}

impl CreateNewsRequest {
    pub fn into_draft(self) -> NewsDraft {
        NewsDraft {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            summary: self.summary.trim().to_string(),
            publish_date: self.publish_date.as_deref().and_then(parse_publish_date),
            is_published: self.is_published,
            category: self.category.and_then(|c| c.parse().ok()),
        }
    }
}

/// Partial update; omitted or blank fields keep their value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsRequest {
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_publish_date"))]
    pub publish_date: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_bool")]
    pub is_published: Option<bool>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
}

impl UploadForm for UpdateNewsRequest {
    const FILE_FIELD: &'static str = "image";
}

impl UpdateNewsRequest {
    pub fn into_patch(self) -> NewsPatch {
        NewsPatch {
            title: self.title,
            content: self.content,
            summary: self.summary,
            publish_date: self.publish_date.as_deref().and_then(parse_publish_date),
            is_published: self.is_published,
            category: self.category.and_then(|c| c.parse().ok()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NewsListQuery {
    /// Page number, starting at 1
    #[serde(default, deserialize_with = "flexible::option_u64")]
    pub page: Option<u64>,
    /// Page size, 1-100 (default 10)
    #[serde(default, deserialize_with = "flexible::option_u64")]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub category: Option<String>,
    /// Ignored for anonymous callers, who only see published posts
    #[serde(default, deserialize_with = "flexible::option_bool")]
    pub is_published: Option<bool>,
}

impl NewsListQuery {
    pub fn filter(&self) -> Result<NewsFilter, DomainError> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<NewsCategory>)
            .transpose()
            .map_err(|e| DomainError::invalid("category", e))?;

        Ok(NewsFilter {
            category,
            is_published: self.is_published,
            references: None,
        })
    }
}
