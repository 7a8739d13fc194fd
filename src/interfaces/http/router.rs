//! API router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, MessageData};
use super::middleware::{authenticate, require_admin, require_auth, require_editor};
use super::modules::request_id::request_id_middleware;
use super::modules::{admin, auth, health, media, news, schedule};
use crate::application::{ContentService, MediaInUseGuard, StatsService, UserService};
use crate::domain::{FieldError, FileStore, MediaAsset, News, RepositoryProvider, ScheduleEntry};
use crate::shared::PaginatedResult;

/// Shared state for every API route.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub users: Arc<UserService>,
    pub news: Arc<ContentService<News>>,
    pub schedule: Arc<ContentService<ScheduleEntry>>,
    pub media: Arc<ContentService<MediaAsset>>,
    pub stats: Arc<StatsService>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire the content services over one repository backend and file store.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        files: Arc<dyn FileStore>,
        users: UserService,
    ) -> Self {
        let media = ContentService::new(repos.clone(), files.clone())
            .with_delete_guard(Arc::new(MediaInUseGuard::new(repos.clone())));

        Self {
            users: Arc::new(users),
            news: Arc::new(ContentService::new(repos.clone(), files.clone())),
            schedule: Arc::new(ContentService::new(repos.clone(), files)),
            media: Arc::new(media),
            stats: Arc::new(StatsService::new(repos.clone())),
            repos,
            started_at: Instant::now(),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            started_at: s.started_at,
        }
    }
}

/// HTTP-level settings that do not belong to any service.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Directory served under `/uploads`
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// Allowed CORS origins; empty or `*` allows any
    pub cors_origins: Vec<String>,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from POST /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::api_info,
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::profile,
        auth::change_password,
        // News
        news::list_news,
        news::get_news,
        news::create_news,
        news::update_news,
        news::delete_news,
        // Schedule
        schedule::list_schedule,
        schedule::get_schedule,
        schedule::create_schedule,
        schedule::update_schedule,
        schedule::delete_schedule,
        // Media
        media::list_media,
        media::get_media,
        media::upload_media,
        media::update_media,
        media::delete_media,
        // Admin
        admin::get_stats,
    ),
    components(
        schemas(
            // Common
            ApiResponse<MessageData>,
            MessageData,
            FieldError,
            PaginatedResult<news::NewsDto>,
            PaginatedResult<schedule::ScheduleDto>,
            PaginatedResult<media::MediaDto>,
            health::ApiInfo,
            health::HealthResponse,
            health::ComponentHealth,
            // Auth
            auth::LoginRequest,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            auth::AuthResponse,
            auth::UserDto,
            // Content
            news::NewsDto,
            news::CreateNewsRequest,
            news::UpdateNewsRequest,
            schedule::ScheduleDto,
            schedule::CreateScheduleRequest,
            schedule::UpdateScheduleRequest,
            media::MediaDto,
            media::UploadMediaRequest,
            media::UpdateMediaRequest,
            // Admin
            admin::StatsDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and storage health"),
        (name = "Authentication", description = "Login, admin-only registration, profile and password change"),
        (name = "News", description = "Studio news; unpublished posts are visible to editors only"),
        (name = "Schedule", description = "Weekly class schedule; inactive classes are visible to editors only"),
        (name = "Media", description = "Uploaded images and documents (editors only)"),
        (name = "Admin", description = "Dashboard statistics (admins only)"),
    ),
    info(
        title = "Studio CMS API",
        version = "0.1.0",
        description = "Content management API for the dance studio website",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Create the application router: `/api`, `/uploads`, `/docs`.
pub fn create_api_router(state: AppState, options: &HttpOptions) -> Router {
    // Auth: login is public, profile/password need a user, registration an admin.
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/profile", get(auth::profile))
                .route("/password", put(auth::change_password))
                .route_layer(middleware::from_fn(require_auth)),
        )
        .merge(
            Router::new()
                .route("/register", post(auth::register))
                .route_layer(middleware::from_fn(require_admin)),
        );

    // News and schedule: public reads, editor writes.
    let news_routes = Router::new()
        .route("/", get(news::list_news))
        .route("/{id}", get(news::get_news))
        .merge(
            Router::new()
                .route("/", post(news::create_news))
                .route("/{id}", put(news::update_news).delete(news::delete_news))
                .route_layer(middleware::from_fn(require_editor)),
        );

    let schedule_routes = Router::new()
        .route("/", get(schedule::list_schedule))
        .route("/{id}", get(schedule::get_schedule))
        .merge(
            Router::new()
                .route("/", post(schedule::create_schedule))
                .route(
                    "/{id}",
                    put(schedule::update_schedule).delete(schedule::delete_schedule),
                )
                .route_layer(middleware::from_fn(require_editor)),
        );

    let media_routes = Router::new()
        .route("/", get(media::list_media).post(media::upload_media))
        .route(
            "/{id}",
            get(media::get_media)
                .put(media::update_media)
                .delete(media::delete_media),
        )
        .route_layer(middleware::from_fn(require_editor));

    let admin_routes = Router::new()
        .route("/stats", get(admin::get_stats))
        .route_layer(middleware::from_fn(require_admin));

    let api_routes = Router::new()
        .route("/", get(health::api_info))
        .route("/health", get(health::health_check))
        .nest("/auth", auth_routes)
        .nest("/news", news_routes)
        .nest("/schedule", schedule_routes)
        .nest("/media", media_routes)
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Multipart framing and text fields ride on top of the file itself.
    let body_limit = usize::try_from(options.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(1024 * 1024);

    Router::new()
        .merge(swagger_routes)
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(&options.upload_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/news/{id}",
            "/api/schedule",
            "/api/media/{id}",
            "/api/admin/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
