//! Admin API handlers

use axum::{extract::State, Json};

use super::dto::StatsDto;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Record counts", body = ApiResponse<StatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<StatsDto> {
    let stats = state.stats.stats().await?;
    Ok(Json(ApiResponse::success(stats.into())))
}
