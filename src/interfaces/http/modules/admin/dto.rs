use serde::Serialize;
use utoipa::ToSchema;

use crate::application::StudioStats;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub news_count: u64,
    pub schedule_count: u64,
    pub media_count: u64,
    pub user_count: u64,
}

impl From<StudioStats> for StatsDto {
    fn from(s: StudioStats) -> Self {
        Self {
            news_count: s.news_count,
            schedule_count: s.schedule_count,
            media_count: s.media_count,
            user_count: s.user_count,
        }
    }
}
