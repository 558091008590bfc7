//! Gabb server: wires configuration, storage, keys, and the database into
//! the HTTP API and serves it.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gabb_api::{AppState, build_app};
use gabb_auth::keys::build_key_provider;
use gabb_auth::revocation::PostgresRevocationStore;
use gabb_auth::{Authorizer, JwtDecoder, SystemClock};
use gabb_core::config::{AppConfig, LogFormat};
use gabb_core::error::AppError;
use gabb_database::connection::DatabasePool;
use gabb_database::migration::run_migrations;
use gabb_storage::manager::{BucketHealth, StorageManager};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, `config/{GABB_ENV}.toml`, and `GABB__*`
/// variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("GABB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Gabb v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(provider = %config.storage.provider, "Initializing object storage...");
    let storage = StorageManager::from_config(&config.storage).await?;
    let keys = build_key_provider(&config.auth, storage.default_store()?);

    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    let revocations = Arc::new(PostgresRevocationStore::new(db.tokens()));
    let authorizer = Authorizer::new(JwtDecoder::new(keys, Arc::new(SystemClock)), revocations);
    let state = AppState::new(authorizer, Arc::new(db.persons()))
        .with_health_check(Arc::new(db.clone()))
        .with_health_check(Arc::new(BucketHealth::new(
            storage,
            config.auth.key_bucket.clone(),
        )));

    let app = build_app(state, &config.server.cors);
    gabb_api::serve(&config.server, app).await?;

    db.close().await;
    Ok(())
}
