//! Order analytics
//!
//! Range resolution, revenue aggregation, status bucketing and the
//! failure-contained entry points built on top of them.

pub mod range;
pub mod revenue;
pub mod service;

pub use range::{resolve, OrderFilter};
pub use revenue::{bucketize, total_revenue, BucketDimension};
pub use service::SalesMetrics;
