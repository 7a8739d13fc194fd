//! Schedule DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::{
    ClassLevel, DomainError, ScheduleDraft, ScheduleEntry, ScheduleFilter, SchedulePatch,
};
use crate::shared::validations::{flexible, validate_clock_time, validate_not_blank};

const DAY_MESSAGE: &str = "must be between 0 (Sunday) and 6 (Saturday)";

fn validate_level(value: &str) -> Result<(), ValidationError> {
    value.parse::<ClassLevel>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("level");
        error.message = Some("must be one of: beginner, intermediate, advanced, all".into());
        error
    })
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub studio: String,
    pub level: String,
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

impl From<ScheduleEntry> for ScheduleDto {
    fn from(e: ScheduleEntry) -> Self {
        Self {
            id: e.id,
            title: e.title,
            description: e.description,
            instructor: e.instructor,
            studio: e.studio,
            level: e.level.to_string(),
            day_of_week: e.day_of_week,
            start_time: e.start_time,
            end_time: e.end_time,
            capacity: e.capacity,
            is_active: e.is_active,
            created_by: e.created_by,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub instructor: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub studio: String,
    /// beginner, intermediate, advanced or all (default)
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_level"))]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_i64")]
    #[validate(
        required(message = "is required"),
        range(min = 0, max = 6, message = "must be between 0 (Sunday) and 6 (Saturday)")
    )]
    pub day_of_week: Option<i64>,
    /// `HH:MM`, 24h
    #[serde(default)]
    #[validate(custom(function = "validate_clock_time"))]
    pub start_time: String,
    #[serde(default)]
    #[validate(custom(function = "validate_clock_time"))]
    pub end_time: String,
    #[serde(default, deserialize_with = "flexible::option_i64")]
    #[validate(
        required(message = "is required"),
        range(min = 1, max = 100000, message = "must be between 1 and 100000")
    )]
    pub capacity: Option<i64>,
    #[serde(default, deserialize_with = "flexible::option_bool")]
    pub is_active: Option<bool>,
}

impl CreateScheduleRequest {
    /// Convert a validated request.
    pub fn into_draft(self) -> ScheduleDraft {
        ScheduleDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            instructor: self.instructor.trim().to_string(),
            studio: self.studio.trim().to_string(),
            level: self.level.and_then(|l| l.parse().ok()),
            day_of_week: self.day_of_week.unwrap_or_default() as u8,
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity.unwrap_or(1) as u32,
            is_active: self.is_active,
        }
    }
}

/// Partial update; omitted or blank fields keep their value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub instructor: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub studio: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_level"))]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_i64")]
    #[validate(range(min = 0, max = 6, message = "must be between 0 (Sunday) and 6 (Saturday)"))]
    pub day_of_week: Option<i64>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_clock_time"))]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    #[validate(custom(function = "validate_clock_time"))]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_i64")]
    #[validate(range(min = 1, max = 100000, message = "must be between 1 and 100000"))]
    pub capacity: Option<i64>,
    #[serde(default, deserialize_with = "flexible::option_bool")]
    pub is_active: Option<bool>,
}

impl UpdateScheduleRequest {
    pub fn into_patch(self) -> SchedulePatch {
        SchedulePatch {
            title: self.title,
            description: self.description,
            instructor: self.instructor,
            studio: self.studio,
            level: self.level.and_then(|l| l.parse().ok()),
            day_of_week: self.day_of_week.map(|d| d as u8),
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity.map(|c| c as u32),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScheduleListQuery {
    #[serde(default, deserialize_with = "flexible::option_u64")]
    pub page: Option<u64>,
    /// Page size, 1-100 (default 100)
    #[serde(default, deserialize_with = "flexible::option_u64")]
    pub limit: Option<u64>,
    /// 0 = Sunday .. 6 = Saturday
    #[serde(default, deserialize_with = "flexible::option_i64")]
    pub day_of_week: Option<i64>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub studio: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "flexible::option_text")]
    pub instructor: Option<String>,
    /// Ignored for anonymous callers, who only see active classes
    #[serde(default, deserialize_with = "flexible::option_bool")]
    pub is_active: Option<bool>,
}

impl ScheduleListQuery {
    pub fn filter(&self) -> Result<ScheduleFilter, DomainError> {
        let day_of_week = self
            .day_of_week
            .map(|d| {
                u8::try_from(d)
                    .ok()
                    .filter(|d| *d <= 6)
                    .ok_or_else(|| DomainError::invalid("dayOfWeek", DAY_MESSAGE))
            })
            .transpose()?;
        let level = self
            .level
            .as_deref()
            .map(str::parse::<ClassLevel>)
            .transpose()
            .map_err(|e| DomainError::invalid("level", e))?;

        Ok(ScheduleFilter {
            day_of_week,
            studio: self.studio.clone(),
            level,
            instructor: self.instructor.clone(),
            is_active: self.is_active,
        })
    }
}
