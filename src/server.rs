//! Reusable server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: storage backend, migrations,
//! the default admin account, the HTTP API and graceful shutdown.
//! [`build_app`] wires the same router over any repository backend, which
//! is what the integration tests use.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::{BootstrapAdmin, LoginAttemptTracker, UserService};
use crate::config::{AppConfig, ConfigError, StorageBackend};
use crate::domain::{DomainError, FileStore, RepositoryProvider};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, LocalFileStore,
    SeaOrmRepositoryProvider,
};
use crate::interfaces::http::{create_api_router, AppState, HttpOptions};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::InfraError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Storage error: {0}")]
    Storage(#[from] InfraError),

    #[error("Startup failed: {0}")]
    Domain(#[from] DomainError),

    #[error("Cannot bind listener: {0}")]
    Io(#[from] std::io::Error),
}

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin if no user exists (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── App wiring ─────────────────────────────────────────────────────

/// Services and router built over one repository backend.
pub struct App {
    pub state: AppState,
    pub router: Router,
}

/// Build services and the HTTP router. Creates the upload directory.
pub async fn build_app(
    config: &AppConfig,
    repos: Arc<dyn RepositoryProvider>,
) -> Result<App, ServerError> {
    let files: Arc<dyn FileStore> =
        Arc::new(LocalFileStore::open(&config.uploads.dir, config.uploads.max_bytes).await?);

    let users = UserService::new(
        repos.clone(),
        config.security.jwt_config(),
        config.security.bcrypt_cost,
        LoginAttemptTracker::new(config.security.lockout_policy()),
    );

    let state = AppState::new(repos, files, users);
    let options = HttpOptions {
        upload_dir: config.uploads.dir.clone(),
        max_upload_bytes: config.uploads.max_bytes,
        cors_origins: config.server.cors_origins.clone(),
    };
    let router = create_api_router(state.clone(), &options);

    Ok(App { state, router })
}

/// Create the configured admin when the user store is empty.
pub async fn seed_default_admin(state: &AppState, config: &AppConfig) -> Result<bool, ServerError> {
    let admin = &config.admin;
    let created = state
        .users
        .ensure_bootstrap_admin(BootstrapAdmin {
            username: admin.username.clone(),
            password: admin.password.clone(),
            name: admin.name.clone(),
            email: admin.email.clone(),
        })
        .await?;
    Ok(created)
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
///
/// ```rust,no_run
/// use studio_cms::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is bound to.
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Open storage, seed the admin account and start serving the API.
    pub async fn start(opts: ServerOptions) -> Result<Self, ServerError> {
        let config = opts.config;
        config.validate()?;

        info!("Starting Studio CMS...");
        if config.security.uses_default_secret() {
            warn!("Using the built-in JWT secret; set security.jwt_secret for production");
        }

        // ── Storage backend ────────────────────────────────────
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            match config.storage.backend {
                StorageBackend::Database => {
                    let db = init_database(&DatabaseConfig {
                        url: config.database.url.clone(),
                        sql_logging: config.database.sql_logging,
                    })
                    .await?;

                    if opts.auto_migrate {
                        info!("Running database migrations...");
                        Migrator::up(&db, None).await?;
                        info!("Migrations completed");
                    }

                    (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
                }
                StorageBackend::Memory => {
                    warn!("In-memory storage selected; data is lost on shutdown");
                    (Arc::new(InMemoryRepositoryProvider::new()), None)
                }
            };

        // ── Services & router ──────────────────────────────────
        let app = build_app(&config, repos.clone()).await?;
        info!(
            dir = %config.uploads.dir.display(),
            max_bytes = config.uploads.max_bytes,
            "Upload storage ready"
        );

        if opts.create_default_admin {
            seed_default_admin(&app.state, &config).await?;
        }

        // ── HTTP server ────────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(
            listener,
            app.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGINT / SIGTERM.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the API to drain after shutdown was triggered, then close storage.
    pub async fn wait(self) {
        info!("Waiting for in-flight requests...");

        let task = self.api_task;
        let drained = self
            .shutdown
            .drain(async move {
                if let Err(e) = task.await {
                    error!("REST API task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("Shutdown timeout reached; abandoning open connections");
        }

        if let Some(db) = self.db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }

        info!("Studio CMS shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down Studio CMS...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the logging config. `RUST_LOG` wins over the
/// configured level.
///
/// Call once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 2;
        config.security.bcrypt_cost = 4;
        config.uploads.dir = dir.join("uploads");
        config
    }

    #[tokio::test]
    async fn starts_and_stops_on_memory_backend() {
        let tmp = tempfile::tempdir().unwrap();
        let handle = ServerHandle::start(ServerOptions {
            config: memory_config(tmp.path()),
            ..ServerOptions::default()
        })
        .await
        .unwrap();

        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);
        assert_eq!(handle.repos.users().count().await.unwrap(), 1);
        assert!(tmp.path().join("uploads").is_dir());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn admin_is_seeded_only_once() {
        let tmp = tempfile::tempdir().unwrap();
        let config = memory_config(tmp.path());
        let app = build_app(&config, Arc::new(InMemoryRepositoryProvider::new()))
            .await
            .unwrap();

        assert!(seed_default_admin(&app.state, &config).await.unwrap());
        assert!(!seed_default_admin(&app.state, &config).await.unwrap());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_binding() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = memory_config(tmp.path());
        config.security.lockout_threshold = 0;

        let result = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
