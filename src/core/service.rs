//! Service trait for order queries

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::filter::FilterSpec;
use crate::core::query::PageResult;
use crate::core::record::Record;
use crate::core::stats::{ChartData, Statistics};

/// Query interface consumed by the dashboard
///
/// Every read first makes sure the dataset is loaded, then filters, then
/// paginates or aggregates. None of these operations fail: an unusable
/// dataset degrades to the built-in defaults, and out-of-range pages are
/// empty pages.
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// One page of filtered records
    async fn get_page(&self, page: usize, page_size: usize, filters: &FilterSpec)
    -> PageResult<Record>;

    /// Headline statistics over the filtered records
    async fn get_statistics(&self, filters: &FilterSpec) -> Statistics;

    /// Chart series over the filtered records
    async fn get_chart_data(&self, filters: &FilterSpec) -> ChartData;

    /// Drop the cached dataset; the next read decodes again
    async fn invalidate(&self);

    /// Current load state
    async fn status(&self) -> StoreStatus;
}

/// Snapshot of the store's load state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    /// Whether a dataset is cached
    pub loaded: bool,
    /// Whether a load is running right now
    pub loading: bool,
    /// Number of cached records
    pub record_count: usize,
    /// Name of the stage that produced the cached records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// When the cached records were produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
}
