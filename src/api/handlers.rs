use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::metrics::SalesMetrics;
use crate::models::{ProductCountKind, RevenueBucket, TimeRange};

pub struct AppState {
    pub metrics: Arc<SalesMetrics>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevenueResponse {
    pub total: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SalesResponse {
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductCountResponse {
    pub kind: ProductCountKind,
    pub count: u64,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Optional reporting window (Unix seconds, inclusive)
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl RangeQuery {
    fn into_range(self) -> Result<Option<TimeRange>, ApiError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(Some(TimeRange::new(start, end))),
            (None, None) => Ok(None),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "start and end must be given together".to_string(),
                }),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductCountQuery {
    #[serde(default = "default_kind")]
    pub kind: ProductCountKind,
}

fn default_kind() -> ProductCountKind {
    ProductCountKind::Total
}

/// Total revenue of a store
pub async fn total_revenue(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<RevenueResponse>, ApiError> {
    let range = params.into_range()?;
    let total = state.metrics.get_total_revenue(&store_id, range).await;
    Ok(Json(RevenueResponse { total }))
}

/// Number of orders of a store
pub async fn total_sales(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<SalesResponse>, ApiError> {
    let range = params.into_range()?;
    let count = state.metrics.get_total_sales(&store_id, range).await;
    Ok(Json(SalesResponse { count }))
}

pub async fn revenue_by_payment_status(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<RevenueBucket>>, ApiError> {
    let range = params.into_range()?;
    let buckets = state
        .metrics
        .get_revenue_by_payment_status(&store_id, range)
        .await;
    Ok(Json(buckets))
}

pub async fn revenue_by_fulfillment_status(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<RevenueBucket>>, ApiError> {
    let range = params.into_range()?;
    let buckets = state
        .metrics
        .get_revenue_by_fulfillment_status(&store_id, range)
        .await;
    Ok(Json(buckets))
}

pub async fn monthly_revenue(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<RevenueBucket>>, ApiError> {
    let range = params.into_range()?;
    let buckets = state.metrics.get_monthly_revenue(&store_id, range).await;
    Ok(Json(buckets))
}

/// Catalog size (cache-backed)
pub async fn product_count(
    State(state): State<Arc<AppState>>,
    Path(store_id): Path<String>,
    Query(params): Query<ProductCountQuery>,
) -> Json<ProductCountResponse> {
    let count = state
        .metrics
        .get_product_count(&store_id, params.kind)
        .await;
    Json(ProductCountResponse {
        kind: params.kind,
        count,
    })
}

/// Health check
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
