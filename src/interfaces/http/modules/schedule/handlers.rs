//! Schedule API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateScheduleRequest, ScheduleDto, ScheduleListQuery, UpdateScheduleRequest};
use crate::domain::{ContentResource, Identity, ScheduleEntry};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, MessageData, ValidatedJson,
};
use crate::interfaces::http::router::AppState;
use crate::shared::{PageRequest, PaginatedResult};

#[utoipa::path(
    get,
    path = "/api/schedule",
    tag = "Schedule",
    params(ScheduleListQuery),
    responses(
        (status = 200, description = "Classes ordered by day and start time", body = ApiResponse<PaginatedResult<ScheduleDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_schedule(
    State(state): State<AppState>,
    caller: Option<Extension<Identity>>,
    Query(query): Query<ScheduleListQuery>,
) -> ApiResult<PaginatedResult<ScheduleDto>> {
    let filter = query.filter()?;
    let page = PageRequest::resolve(query.page, query.limit, ScheduleEntry::DEFAULT_PAGE_SIZE);

    let result = state
        .schedule
        .list(filter, page, caller.as_ref().map(|Extension(i)| i))
        .await?;
    Ok(Json(ApiResponse::success(result.map(ScheduleDto::from))))
}

#[utoipa::path(
    get,
    path = "/api/schedule/{id}",
    tag = "Schedule",
    params(("id" = String, Path, description = "Schedule entry ID")),
    responses(
        (status = 200, description = "Schedule entry", body = ApiResponse<ScheduleDto>),
        (status = 403, description = "Inactive class"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    caller: Option<Extension<Identity>>,
    Path(id): Path<String>,
) -> ApiResult<ScheduleDto> {
    let entry = state
        .schedule
        .get_by_id(&id, caller.as_ref().map(|Extension(i)| i))
        .await?;
    Ok(Json(ApiResponse::success(entry.into())))
}

#[utoipa::path(
    post,
    path = "/api/schedule",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<ScheduleDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Editor role required")
    )
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(request): ValidatedJson<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ScheduleDto>>), ApiError> {
    let entry = state
        .schedule
        .create(request.into_draft(), None, &identity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry.into()))))
}

#[utoipa::path(
    put,
    path = "/api/schedule/{id}",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Schedule entry ID")),
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Class updated", body = ApiResponse<ScheduleDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateScheduleRequest>,
) -> ApiResult<ScheduleDto> {
    let entry = state
        .schedule
        .update(&id, request.into_patch(), None)
        .await?;
    Ok(Json(ApiResponse::success(entry.into())))
}

#[utoipa::path(
    delete,
    path = "/api/schedule/{id}",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Schedule entry ID")),
    responses(
        (status = 200, description = "Class deleted", body = ApiResponse<MessageData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageData> {
    state.schedule.delete(&id).await?;
    Ok(Json(ApiResponse::success(MessageData::new("Schedule entry deleted"))))
}
