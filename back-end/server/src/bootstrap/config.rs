//! Process configuration assembled from environment variables.
//!
//! `Config::from_env` loads `.env` (if present) and then reads every section.
//! Values with sensible local defaults fall back silently; values a selected
//! remote backend cannot run without fail with `AppError::Config`.

use std::time::Duration;

use errors::AppError;
use tracing::warn;

use crate::utils::env::{
    env_bool, env_duration_secs, env_i64, env_list, env_string, env_string_opt, env_u16,
    env_u32, env_usize,
};

const DEV_JWT_SECRET: &str = "dev-only-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub jwt: JwtConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    pub payments: PaymentConfig,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub logging_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_port: u16,
    pub host: String,
    /// Request body cap, sized for note uploads
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` allows any origin
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_minutes: i64,
}

/// Which identity provider verifies bearer credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityBackend {
    /// HS256 tokens issued by this server on `/auth/login`
    Local,
    /// Hosted auth service (`GET {base}/auth/v1/user`)
    Remote,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub backend: IdentityBackend,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Remote,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub key_id: Option<String>,
    pub key_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            db: DbConfig::from_env(),
            server: ServerConfig::from_env(),
            cors: CorsConfig::from_env(),
            jwt: JwtConfig::from_env(),
            identity: IdentityConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            payments: PaymentConfig::from_env(),
        })
    }
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self {
            url: env_string("DATABASE_URL", "sqlite://notes.db?mode=rwc"),
            max_connections: env_u32("DB_MAX_CONNECTIONS", 20),
            min_connections: env_u32("DB_MIN_CONNECTIONS", 1),
            connect_timeout: env_duration_secs("DB_CONNECT_TIMEOUT_SECS", 8),
            idle_timeout: env_duration_secs("DB_IDLE_TIMEOUT_SECS", 600),
            max_lifetime: env_duration_secs("DB_MAX_LIFETIME_SECS", 1800),
            logging_enabled: env_bool("DB_LOGGING", false),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            rest_port: env_u16("REST_PORT", 8000),
            host: env_string("HOST", "0.0.0.0"),
            max_upload_bytes: env_usize("UPLOAD_MAX_BYTES", 20 * 1024 * 1024),
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self {
            allowed_origins: env_list(
                "CORS_ALLOWED_ORIGINS",
                &["http://localhost:5173", "http://localhost:3000"],
            ),
            allow_credentials: env_bool("CORS_ALLOW_CREDENTIALS", false),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env_string_opt("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });

        Self {
            secret,
            expiry_minutes: env_i64("JWT_EXPIRY_MINUTES", 30),
        }
    }
}

impl IdentityConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let backend = match env_string("IDENTITY_PROVIDER", "local").to_lowercase().as_str() {
            "local" => IdentityBackend::Local,
            "remote" | "supabase" => IdentityBackend::Remote,
            other => {
                return Err(AppError::config(format!(
                    "IDENTITY_PROVIDER must be 'local' or 'remote', got '{other}'"
                )))
            }
        };

        let remote_url = env_string_opt("SUPABASE_URL");
        let remote_key = env_string_opt("SUPABASE_KEY");

        if backend == IdentityBackend::Remote && (remote_url.is_none() || remote_key.is_none()) {
            return Err(AppError::config(
                "IDENTITY_PROVIDER=remote requires SUPABASE_URL and SUPABASE_KEY",
            ));
        }

        Ok(Self {
            backend,
            remote_url,
            remote_key,
            cache_ttl: env_duration_secs("TOKEN_CACHE_TTL_SECS", 300),
            cache_capacity: env_usize("TOKEN_CACHE_CAPACITY", 1024).max(1),
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let backend = match env_string("STORAGE_BACKEND", "memory").to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "remote" | "supabase" => StorageBackend::Remote,
            other => {
                return Err(AppError::config(format!(
                    "STORAGE_BACKEND must be 'memory' or 'remote', got '{other}'"
                )))
            }
        };

        let base_url = env_string_opt("SUPABASE_URL");
        let api_key = env_string_opt("SUPABASE_KEY");

        if backend == StorageBackend::Remote && (base_url.is_none() || api_key.is_none()) {
            return Err(AppError::config(
                "STORAGE_BACKEND=remote requires SUPABASE_URL and SUPABASE_KEY",
            ));
        }

        Ok(Self {
            backend,
            base_url,
            api_key,
            bucket: env_string("STORAGE_BUCKET", "notes"),
        })
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            key_id: env_string_opt("RAZORPAY_KEY_ID"),
            key_secret: env_string_opt("RAZORPAY_KEY_SECRET"),
        }
    }
}
