use crate::metrics::OrderFilter;
use crate::models::{Order, ProductCountKind};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// The record source could not be reached or rejected the query
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("record source query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("record source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Initialize the source (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Orders of `filter.store_id` inside the filter's time window,
    /// ordered by creation time
    async fn fetch_orders(&self, filter: &OrderFilter) -> FetchResult<Vec<Order>>;

    /// Number of products of a store matching `kind`
    async fn fetch_catalog_count(&self, store_id: &str, kind: ProductCountKind)
        -> FetchResult<u64>;
}
