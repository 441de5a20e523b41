/// Configuration management for diary-service
///
/// Everything is read from environment variables (a `.env` file is loaded
/// first by the binary). Production refuses permissive CORS and the
/// in-memory store.
use db_pool::env_utils::{parse_env_list, parse_env_with_default};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// User ids promoted to admin when first seen
    pub bootstrap_admins: Vec<Uuid>,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of HTTP worker threads
    pub workers: usize,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "DIARY_STORAGE must be 'postgres' or 'memory', got '{other}'"
            )),
        }
    }
}

/// Database configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Storage adapter to run against
    pub storage: StorageBackend,
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("storage", &self.storage)
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let app = AppConfig {
            env: app_env,
            host: std::env::var("DIARY_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_with_default("DIARY_SERVICE_PORT", 8085),
            workers: parse_env_with_default("HTTP_WORKERS", 4usize).max(1),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if production => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "http://localhost:3000".to_string(),
            };

            if production && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let storage = match std::env::var("DIARY_STORAGE") {
            Ok(raw) => raw.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Postgres,
        };
        if production && storage == StorageBackend::Memory {
            return Err("DIARY_STORAGE=memory is not allowed in production".to_string());
        }

        let database = DatabaseConfig {
            storage,
            url: match std::env::var("DATABASE_URL") {
                Ok(url) => url,
                Err(_) if storage == StorageBackend::Postgres && production => {
                    return Err("DATABASE_URL must be set in production".to_string())
                }
                Err(_) => "postgresql://localhost/diary".to_string(),
            },
            max_connections: parse_env_with_default("DATABASE_MAX_CONNECTIONS", 10),
        };

        let bootstrap_admins = parse_env_list::<Uuid>("DIARY_BOOTSTRAP_ADMINS")?;

        Ok(Config {
            app,
            cors,
            database,
            bootstrap_admins,
        })
    }
}
