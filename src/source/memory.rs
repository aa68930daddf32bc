use crate::metrics::OrderFilter;
use crate::models::{Order, Product, ProductCountKind};
use crate::source::{FetchResult, RecordSource};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreRecords {
    orders: Vec<Order>,
    products: Vec<Product>,
}

/// Process-local record source, keyed by store id
#[derive(Default)]
pub struct MemorySource {
    stores: RwLock<HashMap<String, StoreRecords>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_order(&self, store_id: &str, order: Order) -> Result<()> {
        let mut stores = self.stores.write().await;
        let records = stores.entry(store_id.to_string()).or_default();

        if records.orders.iter().any(|existing| existing.id == order.id) {
            anyhow::bail!("order {} already exists in store {}", order.id, store_id);
        }
        records.orders.push(order);
        Ok(())
    }

    pub async fn insert_product(&self, store_id: &str, product: Product) -> Result<()> {
        let mut stores = self.stores.write().await;
        let records = stores.entry(store_id.to_string()).or_default();

        if records.products.iter().any(|existing| existing.id == product.id) {
            anyhow::bail!("product {} already exists in store {}", product.id, store_id);
        }
        records.products.push(product);
        Ok(())
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch_orders(&self, filter: &OrderFilter) -> FetchResult<Vec<Order>> {
        let stores = self.stores.read().await;

        let mut orders: Vec<Order> = stores
            .get(&filter.store_id)
            .map(|records| {
                records
                    .orders
                    .iter()
                    .filter(|order| filter.matches(order))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    async fn fetch_catalog_count(
        &self,
        store_id: &str,
        kind: ProductCountKind,
    ) -> FetchResult<u64> {
        let stores = self.stores.read().await;

        let count = stores
            .get(store_id)
            .map(|records| records.products.iter().filter(|p| kind.matches(p)).count())
            .unwrap_or(0);

        Ok(count as u64)
    }
}
