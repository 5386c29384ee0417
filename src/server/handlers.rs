//! HTTP handlers for order queries
//!
//! Thin wrappers: parse the query string, call [`OrderQuery`], return JSON.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::QueryConfig;
use crate::core::filter::FilterSpec;
use crate::core::query::{OrderQueryParams, PageResult};
use crate::core::record::Record;
use crate::core::service::{OrderQuery, StoreStatus};
use crate::core::stats::{ChartData, Statistics};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderQuery>,
    pub query_config: QueryConfig,
}

/// `GET /orders`
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderQueryParams>,
) -> Json<PageResult<Record>> {
    let page_size = params.page_size(
        state.query_config.default_page_size,
        state.query_config.max_page_size,
    );
    let page = state
        .orders
        .get_page(params.page(), page_size, &params.filters())
        .await;
    Json(page)
}

/// `GET /statistics`
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(filters): Query<FilterSpec>,
) -> Json<Statistics> {
    Json(state.orders.get_statistics(&filters).await)
}

/// `GET /charts`
pub async fn get_charts(
    State(state): State<AppState>,
    Query(filters): Query<FilterSpec>,
) -> Json<ChartData> {
    Json(state.orders.get_chart_data(&filters).await)
}

/// `GET /status`
pub async fn get_status(State(state): State<AppState>) -> Json<StoreStatus> {
    Json(state.orders.status().await)
}

/// `POST /refresh`
pub async fn refresh(State(state): State<AppState>) -> StatusCode {
    state.orders.invalidate().await;
    tracing::info!("Dataset refresh requested");
    StatusCode::NO_CONTENT
}

/// `GET /health`
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "orderboard"
    }))
}
