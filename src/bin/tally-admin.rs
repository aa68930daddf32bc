use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tally::cache::CountCache;
use tally::config::{Config, DatabaseBackend};
use tally::metrics::SalesMetrics;
use tally::models::{Order, OrderItem, OrderStatus, Product, ProductCountKind, TimeRange};
use tally::source::{MemorySource, PostgresSource, RecordSource, SqliteSource};

#[derive(Parser)]
#[command(name = "tally-admin")]
#[command(about = "Tally store metrics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every sales metric of a store as JSON
    Report {
        /// Store identifier
        store_id: String,
        /// Window start (Unix seconds or RFC 3339)
        #[arg(long, value_parser = parse_timestamp, requires = "end")]
        start: Option<i64>,
        /// Window end (Unix seconds or RFC 3339)
        #[arg(long, value_parser = parse_timestamp, requires = "start")]
        end: Option<i64>,
    },
    /// Print a catalog count
    Products {
        /// Store identifier
        store_id: String,
        /// total, active or featured
        #[arg(long, default_value = "total")]
        kind: ProductCountKind,
    },
    /// Insert a small sample data set for a store
    SeedDemo {
        /// Store identifier
        store_id: String,
    },
}

fn parse_timestamp(value: &str) -> Result<i64, String> {
    if let Ok(secs) = value.parse::<i64>() {
        return Ok(secs);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp())
        .map_err(|e| format!("expected Unix seconds or RFC 3339 timestamp: {e}"))
}

fn demo_orders(now: i64) -> Vec<Order> {
    const DAY: i64 = 86_400;
    let lines = [
        (1, true, OrderStatus::Delivered, vec![OrderItem::new(100.0, Some(2))]),
        (3, false, OrderStatus::Processing, vec![OrderItem::new(50.0, None)]),
        (
            20,
            true,
            OrderStatus::Delivering,
            vec![OrderItem::new(19.99, Some(3)), OrderItem::new(5.0, None)],
        ),
        (45, false, OrderStatus::Canceled, vec![OrderItem::new(75.5, Some(1))]),
        (90, true, OrderStatus::Delivered, vec![OrderItem::new(12.0, Some(10))]),
    ];

    lines
        .into_iter()
        .enumerate()
        .map(|(i, (days_ago, is_paid, order_status, items))| Order {
            id: format!("demo-{}", i + 1),
            created_at: now - days_ago * DAY,
            is_paid,
            order_status,
            items,
        })
        .collect()
}

fn demo_products() -> Vec<Product> {
    [("widget", true, false), ("gadget", false, false), ("relic", true, true)]
        .into_iter()
        .map(|(id, is_featured, is_archived)| Product {
            id: id.to_string(),
            is_featured,
            is_archived,
        })
        .collect()
}

async fn open_source(config: &Config) -> Result<Arc<dyn RecordSource>> {
    let db = &config.database;
    let source: Arc<dyn RecordSource> = match db.backend {
        DatabaseBackend::Sqlite => Arc::new(SqliteSource::new(&db.url, db.max_connections).await?),
        DatabaseBackend::Postgres => {
            Arc::new(PostgresSource::new(&db.url, db.max_connections).await?)
        }
        DatabaseBackend::Memory => Arc::new(MemorySource::new()),
    };
    source.init().await?;
    Ok(source)
}

async fn seed_demo(config: &Config, store_id: &str) -> Result<()> {
    let db = &config.database;
    let now = Utc::now().timestamp();

    match db.backend {
        DatabaseBackend::Sqlite => {
            let source = SqliteSource::new(&db.url, db.max_connections).await?;
            source.init().await?;
            for order in demo_orders(now) {
                source.insert_order(store_id, &order).await?;
            }
            for product in demo_products() {
                source.insert_product(store_id, &product).await?;
            }
        }
        DatabaseBackend::Postgres => {
            let source = PostgresSource::new(&db.url, db.max_connections).await?;
            source.init().await?;
            for order in demo_orders(now) {
                source.insert_order(store_id, &order).await?;
            }
            for product in demo_products() {
                source.insert_product(store_id, &product).await?;
            }
        }
        DatabaseBackend::Memory => {
            anyhow::bail!("seed-demo needs a persistent backend (DATABASE_BACKEND=sqlite|postgres)")
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Report {
            store_id,
            start,
            end,
        } => {
            let range = start.zip(end).map(|(start, end)| TimeRange::new(start, end));
            let source = open_source(&config).await?;
            let metrics = SalesMetrics::new(
                source,
                Arc::new(CountCache::with_ttl_millis(config.cache.ttl_millis)),
            );

            let report = serde_json::json!({
                "store_id": store_id,
                "range": range,
                "total_revenue": metrics.get_total_revenue(&store_id, range).await,
                "total_sales": metrics.get_total_sales(&store_id, range).await,
                "revenue_by_payment_status":
                    metrics.get_revenue_by_payment_status(&store_id, range).await,
                "revenue_by_fulfillment_status":
                    metrics.get_revenue_by_fulfillment_status(&store_id, range).await,
                "monthly_revenue": metrics.get_monthly_revenue(&store_id, range).await,
                "products": {
                    "total": metrics.get_product_count(&store_id, ProductCountKind::Total).await,
                    "active": metrics.get_product_count(&store_id, ProductCountKind::Active).await,
                    "featured": metrics.get_product_count(&store_id, ProductCountKind::Featured).await,
                },
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to render report")?
            );
        }
        Commands::Products { store_id, kind } => {
            let source = open_source(&config).await?;
            let metrics = SalesMetrics::new(
                source,
                Arc::new(CountCache::with_ttl_millis(config.cache.ttl_millis)),
            );
            let count = metrics.get_product_count(&store_id, kind).await;
            println!("{} products ({}) in store {}", count, kind, store_id);
        }
        Commands::SeedDemo { store_id } => {
            seed_demo(&config, &store_id).await?;
            println!("✅ Seeded demo orders and products for store {}", store_id);
        }
    }

    Ok(())
}
