use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_server: ServerConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Expiry of cached catalog counts
    #[serde(default = "CacheConfig::default_ttl_millis")]
    pub ttl_millis: u64,
}

impl CacheConfig {
    fn default_ttl_millis() -> u64 {
        DEFAULT_TTL.as_millis() as u64
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_millis: Self::default_ttl_millis(),
        }
    }
}

fn parse_backend(value: &str) -> DatabaseBackend {
    match value.to_lowercase().as_str() {
        "postgres" | "postgresql" => DatabaseBackend::Postgres,
        "memory" => DatabaseBackend::Memory,
        "sqlite" => DatabaseBackend::Sqlite,
        other => {
            tracing::warn!(
                "Unknown DATABASE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres, memory"
            );
            DatabaseBackend::Sqlite
        }
    }
}

fn parse_ttl_millis(value: Option<String>) -> u64 {
    match value {
        None => CacheConfig::default_ttl_millis(),
        Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid COUNT_CACHE_TTL_MS '{raw}', using default of {}ms",
                CacheConfig::default_ttl_millis()
            );
            CacheConfig::default_ttl_millis()
        }),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = parse_backend(
            &std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string()),
        );

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./tally.db".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = std::env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let ttl_millis = parse_ttl_millis(std::env::var("COUNT_CACHE_TTL_MS").ok());

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            cache: CacheConfig { ttl_millis },
        })
    }
}
