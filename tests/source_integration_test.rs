//! Integration tests for the SQL record sources and the metrics built on them
//!
//! Tests can be filtered by database backend using the DATABASE_BACKEND environment variable:
//! - `DATABASE_BACKEND=sqlite cargo test` - Run only SQLite tests
//! - `DATABASE_BACKEND=postgres cargo test` - Run only PostgreSQL tests (needs DATABASE_URL)
//! - By default, both backends are tested

use std::sync::Arc;
use tally::cache::CountCache;
use tally::metrics::{resolve, SalesMetrics};
use tally::models::{Order, OrderItem, OrderStatus, Product, ProductCountKind, TimeRange};
use tally::source::{PostgresSource, RecordSource, SqliteSource};

/// Get the database backend to test from environment variable
fn should_test_backend(backend: &str) -> bool {
    match std::env::var("DATABASE_BACKEND") {
        Ok(val) => val.to_lowercase() == backend.to_lowercase(),
        Err(_) => true,
    }
}

fn order(id: &str, created_at: i64, is_paid: bool, status: &str, items: Vec<OrderItem>) -> Order {
    Order {
        id: id.to_string(),
        created_at,
        is_paid,
        order_status: OrderStatus::from(status),
        items,
    }
}

fn sample_orders() -> Vec<Order> {
    vec![
        order("o1", 1_000, true, "Delivered", vec![OrderItem::new(100.0, Some(2))]),
        order("o2", 2_000, false, "Processing", vec![OrderItem::new(50.0, None)]),
        order(
            "o3",
            3_000,
            false,
            "Canceled",
            vec![OrderItem::new(10.0, Some(1)), OrderItem::new(2.5, Some(4))],
        ),
        order("o4", 4_000, true, "Refunded", vec![OrderItem::new(40.0, None)]),
        order("o5", 5_000, true, "Delivering", vec![]),
    ]
}

fn sample_products() -> Vec<Product> {
    [("p1", true, false), ("p2", false, false), ("p3", true, true), ("p4", false, true)]
        .into_iter()
        .map(|(id, is_featured, is_archived)| Product {
            id: id.to_string(),
            is_featured,
            is_archived,
        })
        .collect()
}

/// Helper to create seeded SQLite test storage
async fn create_sqlite_source() -> Arc<SqliteSource> {
    let source = SqliteSource::new("sqlite::memory:", 5).await.unwrap();
    source.init().await.unwrap();
    for order in sample_orders() {
        source.insert_order("store-a", &order).await.unwrap();
    }
    source
        .insert_order("store-b", &order("b1", 1_500, true, "Delivered", vec![OrderItem::new(7.0, None)]))
        .await
        .unwrap();
    for product in sample_products() {
        source.insert_product("store-a", &product).await.unwrap();
    }
    Arc::new(source)
}

/// Helper to create seeded PostgreSQL test storage
async fn create_postgres_source() -> Option<Arc<PostgresSource>> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    let source = PostgresSource::new(&db_url, 5).await.ok()?;
    source.init().await.ok()?;

    // Unique store id per run so reruns against the same database stay isolated
    let store_id = format!("store-{}", std::process::id());
    for order in sample_orders() {
        source.insert_order(&store_id, &order).await.ok()?;
    }
    Some(Arc::new(source))
}

fn metrics_for(source: Arc<dyn RecordSource>) -> SalesMetrics {
    SalesMetrics::new(source, Arc::new(CountCache::default()))
}

#[tokio::test]
async fn test_fetch_orders_preserves_items_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let source = create_sqlite_source().await;
    let orders = source.fetch_orders(&resolve("store-a", None)).await.unwrap();

    assert_eq!(orders.len(), 5);
    let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["o1", "o2", "o3", "o4", "o5"]);

    assert_eq!(orders[0].items, vec![OrderItem::new(100.0, Some(2))]);
    assert_eq!(orders[1].items[0].quantity, None);
    assert_eq!(orders[2].items.len(), 2);
    assert_eq!(orders[3].order_status, OrderStatus::Other("Refunded".to_string()));
    assert!(orders[4].items.is_empty());
    assert!(orders[0].is_paid);
    assert!(!orders[1].is_paid);
}

#[tokio::test]
async fn test_fetch_orders_range_is_inclusive_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let source = create_sqlite_source().await;
    let filter = resolve("store-a", Some(TimeRange::new(2_000, 4_000)));
    let orders = source.fetch_orders(&filter).await.unwrap();

    let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["o2", "o3", "o4"]);
}

#[tokio::test]
async fn test_metrics_over_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let metrics = metrics_for(create_sqlite_source().await);

    // 200 + 50 + (10 + 10) + 40 + 0
    assert_eq!(metrics.get_total_revenue("store-a", None).await, 310.0);
    assert_eq!(metrics.get_total_sales("store-a", None).await, 5);
    assert_eq!(metrics.get_total_revenue("store-b", None).await, 7.0);

    let payment = metrics.get_revenue_by_payment_status("store-a", None).await;
    assert_eq!(payment[0].name, "Paid");
    assert_eq!(payment[0].total, 240.0);
    assert_eq!(payment[1].name, "Not Paid");
    assert_eq!(payment[1].total, 70.0);

    // The Refunded order has no fulfillment bucket
    let fulfillment = metrics.get_revenue_by_fulfillment_status("store-a", None).await;
    let totals: Vec<(&str, f64)> = fulfillment
        .iter()
        .map(|b| (b.name.as_str(), b.total))
        .collect();
    assert_eq!(
        totals,
        vec![
            ("Processing", 50.0),
            ("Delivering", 0.0),
            ("Delivered", 200.0),
            ("Canceled", 20.0),
        ]
    );
}

#[tokio::test]
async fn test_empty_window_yields_zero_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let metrics = metrics_for(create_sqlite_source().await);
    let instant = Some(TimeRange::new(1_001, 1_001));

    assert_eq!(metrics.get_total_revenue("store-a", instant).await, 0.0);
    assert_eq!(metrics.get_total_sales("store-a", instant).await, 0);
}

#[tokio::test]
async fn test_catalog_counts_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let source = create_sqlite_source().await;

    assert_eq!(
        source.fetch_catalog_count("store-a", ProductCountKind::Total).await.unwrap(),
        4
    );
    assert_eq!(
        source.fetch_catalog_count("store-a", ProductCountKind::Active).await.unwrap(),
        2
    );
    assert_eq!(
        source.fetch_catalog_count("store-a", ProductCountKind::Featured).await.unwrap(),
        1
    );
    assert_eq!(
        source.fetch_catalog_count("store-b", ProductCountKind::Total).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_cached_count_ignores_new_products_until_expiry_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let source = create_sqlite_source().await;
    let metrics = metrics_for(source.clone());

    assert_eq!(metrics.get_product_count("store-a", ProductCountKind::Total).await, 4);

    source
        .insert_product(
            "store-a",
            &Product {
                id: "p5".to_string(),
                is_featured: false,
                is_archived: false,
            },
        )
        .await
        .unwrap();

    // Still served from the cache within the TTL
    assert_eq!(metrics.get_product_count("store-a", ProductCountKind::Total).await, 4);
}

#[tokio::test]
async fn test_concurrent_metric_requests_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let metrics = Arc::new(metrics_for(create_sqlite_source().await));
    let mut handles = vec![];

    for _ in 0..10 {
        let metrics = Arc::clone(&metrics);
        handles.push(tokio::spawn(async move {
            (
                metrics.get_total_revenue("store-a", None).await,
                metrics.get_product_count("store-a", ProductCountKind::Active).await,
            )
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), (310.0, 2));
    }
}

#[tokio::test]
async fn test_metrics_over_postgres() {
    if !should_test_backend("postgres") {
        return;
    }

    let Some(source) = create_postgres_source().await else {
        println!("Skipping PostgreSQL test: DATABASE_URL not set or unreachable");
        return;
    };

    let store_id = format!("store-{}", std::process::id());
    let metrics = metrics_for(source);

    assert_eq!(metrics.get_total_revenue(&store_id, None).await, 310.0);
    assert_eq!(metrics.get_total_sales(&store_id, Some(TimeRange::new(2_000, 4_000))).await, 3);
}
