//! Authentication API handlers
//!
//! Thin wrappers over `UserService`; lockout, hashing and token issuing live
//! in the application layer.

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UserDto};
use crate::domain::Identity;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, MessageData, ValidatedJson};
use crate::interfaces::http::middleware::ClientKey;
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many failed attempts; see Retry-After")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let result = state
        .users
        .login(&client, request.username.trim(), &request.password)
        .await?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let result = state.users.register(request.into_registration()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result.into()))))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<UserDto> {
    let user = state.users.profile(&identity).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageData>),
        (status = 400, description = "Validation error or wrong current password"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<MessageData> {
    state
        .users
        .change_password(&identity, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(ApiResponse::success(MessageData::new(
        "Password changed successfully",
    ))))
}
