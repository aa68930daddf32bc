//! JSON reporting surface over [`SalesMetrics`](crate::metrics::SalesMetrics)

pub mod handlers;
pub mod routes;

pub use routes::create_api_router;
