//! Studio CMS CLI server
//!
//! ```sh
//! # Run with default config (~/.config/studio-cms/config.toml)
//! studio-cms
//!
//! # Custom config path
//! studio-cms --config /etc/studio-cms/config.toml
//!
//! # Throwaway instance without a database
//! studio-cms --memory --port 8080
//!
//! # Validate config without starting
//! studio-cms --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use studio_cms::config::{AppConfig, StorageBackend};
use studio_cms::server::{init_tracing, ServerHandle, ServerOptions};

/// Studio CMS: news, class schedule and media for the studio website.
#[derive(Parser, Debug)]
#[command(
    name = "studio-cms",
    version,
    about = "Content management API for a dance studio website",
    long_about = "Studio CMS REST API server with Swagger UI at /docs.\n\n\
                  Default config: ~/.config/studio-cms/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "STUDIO_CMS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Keep all data in memory instead of the database.
    #[arg(long)]
    memory: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(studio_cms::default_config_path);

    let mut config = if config_path.exists() {
        match AppConfig::load(&config_path) {
            Ok(cfg) => {
                init_tracing(&cfg);
                info!("Configuration loaded from {}", config_path.display());
                cfg
            }
            Err(e) => {
                init_tracing(&AppConfig::default());
                error!("Failed to load config from {}: {}", config_path.display(), e);
                return Err(e.into());
            }
        }
    } else {
        let cfg = AppConfig::default();
        init_tracing(&cfg);
        warn!(
            "No config file at {}; using defaults",
            config_path.display()
        );
        cfg
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
        config.logging.level = level.clone();
    }
    if cli.memory {
        info!("CLI override: storage backend = memory");
        config.storage.backend = StorageBackend::Memory;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Storage     : {:?}", config.storage.backend);
        println!("   Database    : {}", config.database.url);
        println!("   Uploads     : {}", config.uploads.dir.display());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
