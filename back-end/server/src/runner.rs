use std::sync::Arc;

use crate::{
    api::{
        platform::Platform,
        servers::{app_state::AppState, rest},
    },
    bootstrap::config::{Config, IdentityBackend, StorageBackend},
    modules::{
        identity::{
            IdentityProvider, IdentityResolver, JwtIssuer, LocalJwtProvider,
            RemoteIdentityProvider, SystemClock, TokenCache,
        },
        payments::RazorpayGateway,
        storage::{BucketStorage, MemoryObjectStorage, ObjectStorage},
    },
};
use errors::AppError;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};
use tracing::{info, warn};

pub async fn run() -> Result<(), AppError> {
    init_tracing();

    let config = Config::from_env()?;
    info!("Configuration loaded. Initializing platform...");

    let db_conn = setup_database(&config).await?;
    let platform = assemble_platform(&config, db_conn)?;
    let app_state = AppState::new(platform);

    rest::start(&app_state, &config).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

async fn setup_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    info!("Setting up Database");

    let db_config = &config.db;
    let mut opt = ConnectOptions::new(&db_config.url);

    opt.max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .connect_timeout(db_config.connect_timeout)
        .idle_timeout(db_config.idle_timeout)
        .max_lifetime(db_config.max_lifetime)
        .sqlx_logging(db_config.logging_enabled);

    let connection = sea_orm::Database::connect(opt)
        .await
        .map_err(|db_err| AppError::Storage(Box::new(db_err)))?;

    info!("Running database migrations...");
    Migrator::up(&connection, None)
        .await
        .map_err(|db_err| AppError::Migration(Box::new(db_err)))?;

    Ok(connection)
}

fn assemble_platform(config: &Config, db_conn: DatabaseConnection) -> Result<Platform, AppError> {
    let jwt = JwtIssuer::new(&config.jwt.secret, config.jwt.expiry_minutes)
        .map_err(|e| AppError::config(format!("Invalid JWT configuration: {e}")))?;

    let provider: Arc<dyn IdentityProvider> = match config.identity.backend {
        IdentityBackend::Local => {
            info!("Identity: locally issued JWTs");
            Arc::new(LocalJwtProvider::new(jwt.clone()))
        }
        IdentityBackend::Remote => {
            let (Some(url), Some(key)) = (&config.identity.remote_url, &config.identity.remote_key)
            else {
                return Err(AppError::config(
                    "Remote identity provider selected without SUPABASE_URL/SUPABASE_KEY",
                ));
            };
            info!("Identity: remote auth service at {}", url);
            Arc::new(RemoteIdentityProvider::new(url, key))
        }
    };

    let identity = IdentityResolver::new(
        provider,
        TokenCache::new(config.identity.cache_capacity, config.identity.cache_ttl),
        Arc::new(SystemClock),
    );

    let storage: Arc<dyn ObjectStorage> = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Object storage is in-memory; uploaded files are lost on restart");
            Arc::new(MemoryObjectStorage::new(&config.storage.bucket))
        }
        StorageBackend::Remote => Arc::new(BucketStorage::new(
            config.storage.base_url.clone(),
            config.storage.api_key.clone(),
            &config.storage.bucket,
        )),
    };

    if config.payments.key_secret.is_none() {
        warn!("RAZORPAY_KEY_SECRET not set; payment verification is unavailable");
    }
    let payments = Arc::new(RazorpayGateway::new(
        config.payments.key_id.clone(),
        config.payments.key_secret.clone(),
    ));

    info!("Platform assembled");
    Ok(Platform::new(db_conn, identity, jwt, storage, payments))
}
