use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tally::api;
use tally::cache::CountCache;
use tally::config::{Config, DatabaseBackend};
use tally::metrics::SalesMetrics;
use tally::source::{MemorySource, PostgresSource, RecordSource, SqliteSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize record source
    let source: Arc<dyn RecordSource> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite record source: {}", config.database.url);
            Arc::new(
                SqliteSource::new(&config.database.url, config.database.max_connections).await?,
            )
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL record source: {}", config.database.url);
            Arc::new(
                PostgresSource::new(&config.database.url, config.database.max_connections).await?,
            )
        }
        DatabaseBackend::Memory => {
            info!("Using in-memory record source (data is not persisted)");
            Arc::new(MemorySource::new())
        }
    };

    info!("Initializing record source...");
    source.init().await?;
    info!("Record source initialized successfully");

    let count_cache = Arc::new(CountCache::with_ttl_millis(config.cache.ttl_millis));
    info!("Product count cache TTL: {}ms", config.cache.ttl_millis);

    let metrics = Arc::new(SalesMetrics::new(source, count_cache));
    let api_router = api::create_api_router(metrics);

    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("Reporting API listening on http://{}", api_addr);
    info!("   - Store metrics available at http://{}/api/stores/<store_id>/...", api_addr);

    axum::serve(api_listener, api_router).await?;

    Ok(())
}
