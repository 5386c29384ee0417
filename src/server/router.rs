//! Router builder for order routes

use crate::server::handlers::{
    AppState, get_charts, get_statistics, get_status, health_check, list_orders, refresh,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build order routes
///
/// - GET /health, /healthz - Liveness
/// - GET /orders - One page of filtered orders
/// - GET /statistics - Headline numbers for the filtered orders
/// - GET /charts - Chart series for the filtered orders
/// - GET /status - Dataset load state
/// - POST /refresh - Drop the cached dataset
pub fn build_order_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/orders", get(list_orders))
        .route("/statistics", get(get_statistics))
        .route("/charts", get(get_charts))
        .route("/status", get(get_status))
        .route("/refresh", post(refresh))
        .with_state(state)
}
