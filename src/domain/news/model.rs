//! News domain entity

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::content::{ContentRepository, ContentResource, StoredFile};
use crate::domain::{DomainResult, RepositoryProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewsCategory {
    #[default]
    Announcement,
    Event,
    Performance,
    Other,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 4] = [
        Self::Announcement,
        Self::Event,
        Self::Performance,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::Event => "event",
            Self::Performance => "performance",
            Self::Other => "other",
        }
    }
}

impl FromStr for NewsCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown news category `{s}`"))
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// News post shown on the public site once published
#[derive(Debug, Clone, PartialEq)]
pub struct News {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    /// Public path of the cover image
    pub image: Option<String>,
    pub publish_date: DateTime<Utc>,
    pub is_published: bool,
    pub category: NewsCategory,
    /// Id of the creating user; not enforced as a foreign key
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    pub summary: String,
    /// Defaults to the creation time
    pub publish_date: Option<DateTime<Utc>>,
    pub is_published: Option<bool>,
    pub category: Option<NewsCategory>,
}

#[derive(Debug, Clone, Default)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub is_published: Option<bool>,
    pub category: Option<NewsCategory>,
}

#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    pub category: Option<NewsCategory>,
    pub is_published: Option<bool>,
    /// Items whose cover image is this path or whose content mentions it
    pub references: Option<String>,
}

/// Parse a publish date given either as RFC 3339 or as a plain `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_publish_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl ContentResource for News {
    type Draft = NewsDraft;
    type Patch = NewsPatch;
    type Filter = NewsFilter;

    const ENTITY: &'static str = "News";
    const DEFAULT_PAGE_SIZE: u64 = 10;
    const PUBLIC_READ: bool = true;

    fn repository(repos: &dyn RepositoryProvider) -> &dyn ContentRepository<Self> {
        repos.news()
    }

    fn create(
        id: String,
        draft: NewsDraft,
        file: Option<StoredFile>,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            title: draft.title,
            content: draft.content,
            summary: draft.summary,
            image: file.map(|f| f.public_path),
            publish_date: draft.publish_date.unwrap_or(now),
            is_published: draft.is_published.unwrap_or(false),
            category: draft.category.unwrap_or_default(),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: NewsPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(publish_date) = patch.publish_date {
            self.publish_date = publish_date;
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn is_public(&self) -> bool {
        self.is_published
    }

    fn restrict_to_public(filter: &mut NewsFilter) {
        filter.is_published = Some(true);
    }

    fn matches(&self, filter: &NewsFilter) -> bool {
        filter.category.map_or(true, |c| c == self.category)
            && filter.is_published.map_or(true, |p| p == self.is_published)
            && filter.references.as_deref().map_or(true, |path| {
                self.image.as_deref() == Some(path) || self.content.contains(path)
            })
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        b.publish_date
            .cmp(&a.publish_date)
            .then_with(|| a.id.cmp(&b.id))
    }

    fn attachment(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn attach(&mut self, file: StoredFile) {
        self.image = Some(file.public_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_draft() -> NewsDraft {
        NewsDraft {
            title: "Spring showcase".into(),
            content: "All groups perform on stage.".into(),
            summary: "Showcase".into(),
            publish_date: None,
            is_published: None,
            category: None,
        }
    }

    #[test]
    fn create_applies_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let news = News::create("n1".into(), sample_draft(), None, "u1", now).unwrap();
        assert_eq!(news.publish_date, now);
        assert!(!news.is_published);
        assert_eq!(news.category, NewsCategory::Announcement);
        assert_eq!(news.image, None);
        assert_eq!(news.created_by, "u1");
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let now = Utc::now();
        let mut news = News::create("n1".into(), sample_draft(), None, "u1", now).unwrap();
        let before = news.clone();
        news.apply(
            NewsPatch {
                is_published: Some(true),
                ..Default::default()
            },
            now,
        );
        assert!(news.is_published);
        assert_eq!(news.title, before.title);
        assert_eq!(news.summary, before.summary);
        assert_eq!(news.category, before.category);
    }

    #[test]
    fn public_restriction_overrides_filter() {
        let mut filter = NewsFilter {
            is_published: Some(false),
            ..Default::default()
        };
        News::restrict_to_public(&mut filter);
        assert_eq!(filter.is_published, Some(true));
    }

    #[test]
    fn references_match_image_or_content() {
        let mut news = News::create("n1".into(), sample_draft(), None, "u1", Utc::now()).unwrap();
        let filter = NewsFilter {
            references: Some("/uploads/a.png".into()),
            ..Default::default()
        };
        assert!(!news.matches(&filter));

        news.content = "See <img src=\"/uploads/a.png\">".into();
        assert!(news.matches(&filter));

        news.content = String::new();
        news.image = Some("/uploads/a.png".into());
        assert!(news.matches(&filter));
    }

    #[test]
    fn publish_date_accepts_rfc3339_and_plain_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_publish_date("2024-05-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_publish_date("2024-05-01"), Some(expected));
        assert_eq!(parse_publish_date("yesterday"), None);
    }

    #[test]
    fn category_parsing() {
        assert_eq!("event".parse::<NewsCategory>(), Ok(NewsCategory::Event));
        assert!("gossip".parse::<NewsCategory>().is_err());
    }
}
