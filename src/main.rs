//! Orderboard server
//!
//! Usage: `orderboard [CONFIG.yaml]`. Without an argument the path is read
//! from `ORDERBOARD_CONFIG`; without either, built-in defaults are used.

use orderboard::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("orderboard=info,tower_http=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ORDERBOARD_CONFIG").ok());

    let config = match config_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading configuration");
            OrderboardConfig::from_yaml_file(&path)?
        }
        None => {
            tracing::info!("No configuration given, using defaults");
            OrderboardConfig::default()
        }
    };

    let store = InMemoryOrderStore::from_config(&config);

    // Warm the cache so the first dashboard request does not pay for decoding
    let dataset = store.initialize().await;
    tracing::info!(
        source = %dataset.source,
        records = dataset.records.len(),
        "Dataset ready"
    );

    ServerBuilder::new()
        .with_order_query(store)
        .with_query_config(config.query.clone())
        .serve(&config.server.bind)
        .await
}
