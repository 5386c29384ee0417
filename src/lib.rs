//! # Orderboard
//!
//! The data-access layer behind a restaurant order dashboard.
//!
//! ## Features
//!
//! - **Obfuscated datasets**: reversible substitution with an optional base64 layer
//! - **Fallback loading**: encoded source, then plain CSV, then built-in records
//! - **Single-flight cache**: concurrent first reads share one decode
//! - **Filtering**: order type, item type and free-text search
//! - **Pagination**: 1-based pages with complete metadata
//! - **Statistics**: revenue, average rating, delivery share, popular items, chart series
//! - **HTTP surface**: axum routes over the query service
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orderboard::prelude::*;
//!
//! let config = OrderboardConfig::from_yaml_file("config/orderboard.yaml")?;
//! let store = InMemoryOrderStore::from_config(&config);
//!
//! let page = store.get_page(1, 50, &FilterSpec::new().with_order_type("外卖")).await;
//! let stats = store.get_statistics(&FilterSpec::default()).await;
//! println!("{} orders, ¥{:.2}", stats.total_orders, stats.total_revenue);
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ChartData, Codec, FilterSpec, OrderQuery, PageInfo, PageResult, Parser, PopularItem,
        RatingDecoder, Record, Statistics, StoreStatus, paginate,
    };

    // === Storage ===
    pub use crate::storage::{
        DataSource, FallbackLoader, FileSource, InMemoryOrderStore, SourceFormat, SourceStage,
        StaticSource,
    };

    // === Config ===
    pub use crate::config::{OrderboardConfig, QueryConfig, SourceLocation, StatsConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}
