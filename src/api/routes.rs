use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::metrics::SalesMetrics;

use super::handlers::{
    health_check, monthly_revenue, product_count, revenue_by_fulfillment_status,
    revenue_by_payment_status, total_revenue, total_sales, AppState,
};

pub fn create_api_router(metrics: Arc<SalesMetrics>) -> Router {
    let state = Arc::new(AppState { metrics });

    let store_routes = Router::new()
        .route("/stores/{store_id}/revenue", get(total_revenue))
        .route("/stores/{store_id}/sales", get(total_sales))
        .route(
            "/stores/{store_id}/revenue/payment-status",
            get(revenue_by_payment_status),
        )
        .route(
            "/stores/{store_id}/revenue/fulfillment-status",
            get(revenue_by_fulfillment_status),
        )
        .route("/stores/{store_id}/revenue/monthly", get(monthly_revenue))
        .route("/stores/{store_id}/products/count", get(product_count))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", store_routes)
        .layer(CorsLayer::permissive())
}
