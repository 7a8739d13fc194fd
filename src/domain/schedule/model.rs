//! Class schedule domain entity

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::content::{ContentRepository, ContentResource, StoredFile};
use crate::domain::{DomainResult, RepositoryProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassLevel {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    All,
}

impl ClassLevel {
    pub const ALL: [ClassLevel; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::All => "all",
        }
    }
}

impl FromStr for ClassLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown class level `{s}`"))
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A weekly recurring class.
///
/// `start_time` and `end_time` are zero-padded `HH:MM`, so string order is
/// chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub studio: String,
    pub level: ClassLevel,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub studio: String,
    pub level: Option<ClassLevel>,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub studio: Option<String>,
    pub level: Option<ClassLevel>,
    pub day_of_week: Option<u8>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub capacity: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub day_of_week: Option<u8>,
    pub studio: Option<String>,
    pub level: Option<ClassLevel>,
    pub instructor: Option<String>,
    pub is_active: Option<bool>,
}

impl ContentResource for ScheduleEntry {
    type Draft = ScheduleDraft;
    type Patch = SchedulePatch;
    type Filter = ScheduleFilter;

    const ENTITY: &'static str = "Schedule";
    const DEFAULT_PAGE_SIZE: u64 = 100;
    const PUBLIC_READ: bool = true;

    fn repository(repos: &dyn RepositoryProvider) -> &dyn ContentRepository<Self> {
        repos.schedules()
    }

    fn create(
        id: String,
        draft: ScheduleDraft,
        _file: Option<StoredFile>,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            instructor: draft.instructor,
            studio: draft.studio,
            level: draft.level.unwrap_or_default(),
            day_of_week: draft.day_of_week,
            start_time: draft.start_time,
            end_time: draft.end_time,
            capacity: draft.capacity,
            is_active: draft.is_active.unwrap_or(true),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: SchedulePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(instructor) = patch.instructor {
            self.instructor = instructor;
        }
        if let Some(studio) = patch.studio {
            self.studio = studio;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(day) = patch.day_of_week {
            self.day_of_week = day;
        }
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn is_public(&self) -> bool {
        self.is_active
    }

    fn restrict_to_public(filter: &mut ScheduleFilter) {
        filter.is_active = Some(true);
    }

    fn matches(&self, filter: &ScheduleFilter) -> bool {
        filter.day_of_week.map_or(true, |d| d == self.day_of_week)
            && filter.studio.as_deref().map_or(true, |s| s == self.studio)
            && filter.level.map_or(true, |l| l == self.level)
            && filter
                .instructor
                .as_deref()
                .map_or(true, |i| i == self.instructor)
            && filter.is_active.map_or(true, |a| a == self.is_active)
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| a.start_time.cmp(&b.start_time))
            .then_with(|| a.id.cmp(&b.id))
    }

    fn attachment(&self) -> Option<&str> {
        None
    }

    fn attach(&mut self, _file: StoredFile) {}
}
