//! # Studio CMS
//!
//! Content management backend for a dance studio website: news posts,
//! the weekly class schedule and a media library, edited by staff with
//! `admin` or `editor` accounts.
//!
//! ## Architecture
//!
//! - **domain**: entities, drafts/patches, repository and file-store traits
//! - **application**: user, content and stats services plus the role gate
//! - **infrastructure**: SeaORM and in-memory repositories, upload storage, JWT and bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime lifecycle shared by the CLI and tests

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

pub use interfaces::http::{create_api_router, ApiDoc, AppState};

pub use server::{build_app, ServerHandle, ServerOptions};
