//! News API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateNewsRequest, NewsDto, NewsListQuery, UpdateNewsRequest};
use crate::domain::{ContentResource, Identity, News};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, ContentForm, MessageData,
};
use crate::interfaces::http::router::AppState;
use crate::shared::{PageRequest, PaginatedResult};

#[utoipa::path(
    get,
    path = "/api/news",
    tag = "News",
    params(NewsListQuery),
    responses(
        (status = 200, description = "News page, newest first", body = ApiResponse<PaginatedResult<NewsDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_news(
    State(state): State<AppState>,
    caller: Option<Extension<Identity>>,
    Query(query): Query<NewsListQuery>,
) -> ApiResult<PaginatedResult<NewsDto>> {
    let filter = query.filter()?;
    let page = PageRequest::resolve(query.page, query.limit, News::DEFAULT_PAGE_SIZE);

    let result = state
        .news
        .list(filter, page, caller.as_ref().map(|Extension(i)| i))
        .await?;
    Ok(Json(ApiResponse::success(result.map(NewsDto::from))))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    tag = "News",
    params(("id" = String, Path, description = "News ID")),
    responses(
        (status = 200, description = "News post", body = ApiResponse<NewsDto>),
        (status = 403, description = "Not published"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    caller: Option<Extension<Identity>>,
    Path(id): Path<String>,
) -> ApiResult<NewsDto> {
    let news = state
        .news
        .get_by_id(&id, caller.as_ref().map(|Extension(i)| i))
        .await?;
    Ok(Json(ApiResponse::success(news.into())))
}

#[utoipa::path(
    post,
    path = "/api/news",
    tag = "News",
    security(("bearer_auth" = [])),
    request_body(
        content = CreateNewsRequest,
        description = "JSON, or multipart/form-data with the same fields and an optional `image` file"
    ),
    responses(
        (status = 201, description = "News created", body = ApiResponse<NewsDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Editor role required"),
        (status = 413, description = "Image too large")
    )
)]
pub async fn create_news(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    form: ContentForm<CreateNewsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NewsDto>>), ApiError> {
    let news = state
        .news
        .create(form.data.into_draft(), form.file, &identity)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(news.into()))))
}

#[utoipa::path(
    put,
    path = "/api/news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "News ID")),
    request_body(
        content = UpdateNewsRequest,
        description = "JSON, or multipart/form-data; a new `image` replaces the old one"
    ),
    responses(
        (status = 200, description = "News updated", body = ApiResponse<NewsDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: ContentForm<UpdateNewsRequest>,
) -> ApiResult<NewsDto> {
    let news = state
        .news
        .update(&id, form.data.into_patch(), form.file)
        .await?;
    Ok(Json(ApiResponse::success(news.into())))
}

#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "News ID")),
    responses(
        (status = 200, description = "News deleted", body = ApiResponse<MessageData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageData> {
    state.news.delete(&id).await?;
    Ok(Json(ApiResponse::success(MessageData::new("News deleted"))))
}
