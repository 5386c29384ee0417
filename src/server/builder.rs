//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::build_order_routes;
use crate::config::QueryConfig;
use crate::core::service::OrderQuery;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let store = InMemoryOrderStore::from_config(&config);
/// ServerBuilder::new()
///     .with_order_query(store)
///     .with_query_config(config.query.clone())
///     .serve(&config.server.bind)
///     .await?;
/// ```
pub struct ServerBuilder {
    orders: Option<Arc<dyn OrderQuery>>,
    query_config: QueryConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            orders: None,
            query_config: QueryConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the order query service (required)
    pub fn with_order_query(mut self, orders: impl OrderQuery + 'static) -> Self {
        self.orders = Some(Arc::new(orders));
        self
    }

    /// Set an already shared order query service (required)
    pub fn with_shared_order_query(mut self, orders: Arc<dyn OrderQuery>) -> Self {
        self.orders = Some(orders);
        self
    }

    /// Set page size limits
    pub fn with_query_config(mut self, query_config: QueryConfig) -> Self {
        self.query_config = query_config;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the router
    pub fn build(self) -> Result<Router> {
        let orders = self
            .orders
            .ok_or_else(|| anyhow::anyhow!("OrderQuery is required. Call .with_order_query()"))?;

        let state = AppState {
            orders,
            query_config: self.query_config,
        };

        let mut app = build_order_routes(state);
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
