//! HTTP surface over the order query service
//!
//! `ServerBuilder` wires an [`OrderQuery`](crate::core::OrderQuery)
//! implementation into an axum router with request tracing and CORS.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
