//! Media API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{MediaDto, MediaListQuery, UpdateMediaRequest, UploadMediaRequest};
use crate::domain::{ContentResource, Identity, MediaAsset};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, ContentForm, MessageData, ValidatedJson,
};
use crate::interfaces::http::router::AppState;
use crate::shared::{PageRequest, PaginatedResult};

#[utoipa::path(
    get,
    path = "/api/media",
    tag = "Media",
    security(("bearer_auth" = [])),
    params(MediaListQuery),
    responses(
        (status = 200, description = "Media page, newest first", body = ApiResponse<PaginatedResult<MediaDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Editor role required")
    )
)]
pub async fn list_media(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<MediaListQuery>,
) -> ApiResult<PaginatedResult<MediaDto>> {
    let filter = query.filter()?;
    let page = PageRequest::resolve(query.page, query.limit, MediaAsset::DEFAULT_PAGE_SIZE);

    let result = state.media.list(filter, page, Some(&identity)).await?;
    Ok(Json(ApiResponse::success(result.map(MediaDto::from))))
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "Media",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media asset", body = ApiResponse<MediaDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_media(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<MediaDto> {
    let asset = state.media.get_by_id(&id, Some(&identity)).await?;
    Ok(Json(ApiResponse::success(asset.into())))
}

#[utoipa::path(
    post,
    path = "/api/media",
    tag = "Media",
    security(("bearer_auth" = [])),
    request_body(
        content = UploadMediaRequest,
        description = "multipart/form-data with a required `file` part"
    ),
    responses(
        (status = 201, description = "File uploaded", body = ApiResponse<MediaDto>),
        (status = 400, description = "Missing file, disallowed type or invalid field"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_media(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    form: ContentForm<UploadMediaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MediaDto>>), ApiError> {
    let asset = state
        .media
        .create(form.data.into_draft(), form.file, &identity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(asset.into()))))
}

#[utoipa::path(
    put,
    path = "/api/media/{id}",
    tag = "Media",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Media ID")),
    request_body = UpdateMediaRequest,
    responses(
        (status = 200, description = "Media updated", body = ApiResponse<MediaDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateMediaRequest>,
) -> ApiResult<MediaDto> {
    let asset = state.media.update(&id, request.into_patch(), None).await?;
    Ok(Json(ApiResponse::success(asset.into())))
}

#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = "Media",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media and file deleted", body = ApiResponse<MessageData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Still used by a news post")
    )
)]
pub async fn delete_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageData> {
    state.media.delete(&id).await?;
    Ok(Json(ApiResponse::success(MessageData::new("Media deleted"))))
}
