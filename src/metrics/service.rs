//! Store sales metrics
//!
//! Every `get_*` operation degrades to its zero value when the record source
//! fails: the error is logged and the caller receives `0` or a zero-filled
//! bucket list. The `try_*` twins expose the underlying `FetchError`.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

use crate::cache::CountCache;
use crate::metrics::range::resolve;
use crate::metrics::revenue::{bucketize, total_revenue, BucketDimension};
use crate::models::{Order, ProductCountKind, RevenueBucket, TimeRange};
use crate::source::{FetchResult, RecordSource};

pub struct SalesMetrics {
    source: Arc<dyn RecordSource>,
    count_cache: Arc<CountCache>,
}

impl SalesMetrics {
    pub fn new(source: Arc<dyn RecordSource>, count_cache: Arc<CountCache>) -> Self {
        Self {
            source,
            count_cache,
        }
    }

    pub fn count_cache(&self) -> &Arc<CountCache> {
        &self.count_cache
    }

    async fn fetch_orders(
        &self,
        store_id: &str,
        range: Option<TimeRange>,
    ) -> FetchResult<Vec<Order>> {
        let filter = resolve(store_id, range);
        self.source.fetch_orders(&filter).await
    }

    pub async fn try_total_revenue(
        &self,
        store_id: &str,
        range: Option<TimeRange>,
    ) -> FetchResult<f64> {
        let orders = self.fetch_orders(store_id, range).await?;
        Ok(total_revenue(&orders))
    }

    pub async fn try_total_sales(
        &self,
        store_id: &str,
        range: Option<TimeRange>,
    ) -> FetchResult<u64> {
        let orders = self.fetch_orders(store_id, range).await?;
        Ok(orders.len() as u64)
    }

    pub async fn try_revenue_by(
        &self,
        store_id: &str,
        range: Option<TimeRange>,
        dimension: BucketDimension,
    ) -> FetchResult<Vec<RevenueBucket>> {
        let orders = self.fetch_orders(store_id, range).await?;
        Ok(bucketize(&orders, dimension))
    }

    /// Catalog count, served from the count cache while fresh
    pub async fn try_product_count(
        &self,
        store_id: &str,
        kind: ProductCountKind,
    ) -> FetchResult<u64> {
        let key = (store_id.to_string(), kind);
        if let Some(count) = self.count_cache.get(&key) {
            return Ok(count);
        }

        debug!("Count cache miss for {}/{}, fetching", store_id, kind);
        let count = self.source.fetch_catalog_count(store_id, kind).await?;
        self.count_cache.put(key, count);
        Ok(count)
    }

    /// Total revenue over the window; unpaid and canceled orders included
    pub async fn get_total_revenue(&self, store_id: &str, range: Option<TimeRange>) -> f64 {
        contain(
            "total_revenue",
            store_id,
            self.try_total_revenue(store_id, range),
            || 0.0,
        )
        .await
    }

    /// Number of orders in the window
    pub async fn get_total_sales(&self, store_id: &str, range: Option<TimeRange>) -> u64 {
        contain(
            "total_sales",
            store_id,
            self.try_total_sales(store_id, range),
            || 0,
        )
        .await
    }

    /// Revenue split into `Paid` and `Not Paid`
    pub async fn get_revenue_by_payment_status(
        &self,
        store_id: &str,
        range: Option<TimeRange>,
    ) -> Vec<RevenueBucket> {
        self.revenue_by("revenue_by_payment_status", store_id, range, BucketDimension::Payment)
            .await
    }

    /// Revenue split by fulfillment status, in
    /// `Processing, Delivering, Delivered, Canceled` order
    pub async fn get_revenue_by_fulfillment_status(
        &self,
        store_id: &str,
        range: Option<TimeRange>,
    ) -> Vec<RevenueBucket> {
        self.revenue_by(
            "revenue_by_fulfillment_status",
            store_id,
            range,
            BucketDimension::Fulfillment,
        )
        .await
    }

    /// Revenue per calendar month (`Jan` .. `Dec`)
    pub async fn get_monthly_revenue(
        &self,
        store_id: &str,
        range: Option<TimeRange>,
    ) -> Vec<RevenueBucket> {
        self.revenue_by("monthly_revenue", store_id, range, BucketDimension::Month)
            .await
    }

    pub async fn get_product_count(&self, store_id: &str, kind: ProductCountKind) -> u64 {
        contain(
            "product_count",
            store_id,
            self.try_product_count(store_id, kind),
            || 0,
        )
        .await
    }

    async fn revenue_by(
        &self,
        operation: &str,
        store_id: &str,
        range: Option<TimeRange>,
        dimension: BucketDimension,
    ) -> Vec<RevenueBucket> {
        contain(
            operation,
            store_id,
            self.try_revenue_by(store_id, range, dimension),
            || dimension.zero_buckets(),
        )
        .await
    }
}

/// Await `fut`, logging a failure and substituting the zero value
async fn contain<T, F, Z>(operation: &str, store_id: &str, fut: F, zero: Z) -> T
where
    F: Future<Output = FetchResult<T>>,
    Z: FnOnce() -> T,
{
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            error!(
                "Failed to compute {} for store {}: {}",
                operation, store_id, e
            );
            zero()
        }
    }
}
