use crate::metrics::OrderFilter;
use crate::models::{Order, Product, ProductCountKind};
use crate::source::rows::{fold_order_lines, OrderLineRow};
use crate::source::{FetchResult, RecordSource};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteSource {
    pool: Arc<SqlitePool>,
}

impl SqliteSource {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Insert an order and its lines for a store
    pub async fn insert_order(&self, store_id: &str, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (store_id, id, created_at, is_paid, order_status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(store_id)
        .bind(&order.id)
        .bind(order.created_at)
        .bind(order.is_paid)
        .bind(order.order_status.as_str())
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (store_id, order_id, position, price, quantity)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(store_id)
            .bind(&order.id)
            .bind(position as i64)
            .bind(item.price)
            .bind(item.quantity.map(i64::from))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Insert a catalog product for a store
    pub async fn insert_product(&self, store_id: &str, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (store_id, id, is_featured, is_archived)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(store_id)
        .bind(&product.id)
        .bind(product.is_featured)
        .bind(product.is_archived)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RecordSource for SqliteSource {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                store_id TEXT NOT NULL,
                id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 0,
                order_status TEXT NOT NULL DEFAULT 'Processing',
                PRIMARY KEY (store_id, id)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_orders_store_created ON orders(store_id, created_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS order_items (
                store_id TEXT NOT NULL,
                order_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                price REAL NOT NULL,
                quantity INTEGER,
                PRIMARY KEY (store_id, order_id, position)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                store_id TEXT NOT NULL,
                id TEXT NOT NULL,
                is_featured INTEGER NOT NULL DEFAULT 0,
                is_archived INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (store_id, id)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn fetch_orders(&self, filter: &OrderFilter) -> FetchResult<Vec<Order>> {
        let rows = match filter.created_between {
            Some(range) => {
                sqlx::query_as::<_, OrderLineRow>(
                    r#"
                    SELECT o.id, o.created_at, o.is_paid, o.order_status, i.price, i.quantity
                    FROM orders o
                    LEFT JOIN order_items i ON i.store_id = o.store_id AND i.order_id = o.id
                    WHERE o.store_id = ? AND o.created_at >= ? AND o.created_at <= ?
                    ORDER BY o.created_at, o.id, i.position
                    "#,
                )
                .bind(&filter.store_id)
                .bind(range.start)
                .bind(range.end)
                .fetch_all(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderLineRow>(
                    r#"
                    SELECT o.id, o.created_at, o.is_paid, o.order_status, i.price, i.quantity
                    FROM orders o
                    LEFT JOIN order_items i ON i.store_id = o.store_id AND i.order_id = o.id
                    WHERE o.store_id = ?
                    ORDER BY o.created_at, o.id, i.position
                    "#,
                )
                .bind(&filter.store_id)
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        Ok(fold_order_lines(rows))
    }

    async fn fetch_catalog_count(
        &self,
        store_id: &str,
        kind: ProductCountKind,
    ) -> FetchResult<u64> {
        let sql = match kind {
            ProductCountKind::Total => "SELECT COUNT(*) FROM products WHERE store_id = ?",
            ProductCountKind::Active => {
                "SELECT COUNT(*) FROM products WHERE store_id = ? AND is_archived = 0"
            }
            ProductCountKind::Featured => {
                "SELECT COUNT(*) FROM products WHERE store_id = ? AND is_featured = 1 AND is_archived = 0"
            }
        };

        let count: i64 = sqlx::query_scalar(sql)
            .bind(store_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.max(0) as u64)
    }
}
