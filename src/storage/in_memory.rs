//! In-memory order store with single-flight initialization

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::OnceCell;

use crate::config::{OrderboardConfig, StatsConfig};
use crate::core::filter::{self, FilterSpec};
use crate::core::query::{PageResult, paginate};
use crate::core::record::Record;
use crate::core::service::{OrderQuery, StoreStatus};
use crate::core::stats::{self, ChartData, Statistics};
use crate::storage::loader::{FallbackLoader, LoadedDataset};

type DatasetCell = Arc<OnceCell<Arc<LoadedDataset>>>;

struct StoreState {
    loader: Arc<FallbackLoader>,
    /// Replaced wholesale on reset, so a load already in flight finishes
    /// into the old cell and never leaks into the new one
    cell: DatasetCell,
}

/// Counts a running load; released on drop so a cancelled load is not
/// reported as still running
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the canonical record set
///
/// The first read decodes the dataset through the fallback chain; later
/// reads reuse it until [`reset`](Self::reset). Concurrent first reads
/// share one load.
pub struct InMemoryOrderStore {
    state: RwLock<StoreState>,
    stats: StatsConfig,
    in_flight: AtomicUsize,
    loads: AtomicUsize,
}

impl InMemoryOrderStore {
    /// Create an empty store; nothing is loaded until the first read
    pub fn new(loader: FallbackLoader, stats: StatsConfig) -> Self {
        Self::with_cell(loader, stats, Arc::new(OnceCell::new()))
    }

    /// Create a store for the configured sources
    pub fn from_config(config: &OrderboardConfig) -> Self {
        Self::new(FallbackLoader::from_config(config), config.stats.clone())
    }

    /// Create a store that already holds `records`
    ///
    /// After a reset it has no sources and serves the built-in records.
    pub fn from_records(records: Vec<Record>, stats: StatsConfig) -> Self {
        let dataset = LoadedDataset {
            records,
            source: "memory".to_string(),
            loaded_at: chrono::Utc::now(),
        };
        Self::with_cell(
            FallbackLoader::builtin_only(),
            stats,
            Arc::new(OnceCell::new_with(Some(Arc::new(dataset)))),
        )
    }

    fn with_cell(loader: FallbackLoader, stats: StatsConfig, cell: DatasetCell) -> Self {
        Self {
            state: RwLock::new(StoreState {
                loader: Arc::new(loader),
                cell,
            }),
            stats,
            in_flight: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    fn snapshot(&self) -> (Arc<FallbackLoader>, DatasetCell) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        (state.loader.clone(), state.cell.clone())
    }

    /// Make sure the dataset is loaded and return it
    ///
    /// Returns immediately when cached. If another caller is already
    /// loading, waits for that load instead of starting a second one.
    pub async fn initialize(&self) -> Arc<LoadedDataset> {
        let (loader, cell) = self.snapshot();
        cell.get_or_init(|| async {
            let _in_flight = InFlight::enter(&self.in_flight);
            self.loads.fetch_add(1, Ordering::SeqCst);
            Arc::new(loader.load().await)
        })
        .await
        .clone()
    }

    /// Forget the cached dataset
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.cell = Arc::new(OnceCell::new());
        tracing::info!("Order store reset");
    }

    /// Swap the fallback chain and forget the cached dataset
    pub fn replace_loader(&self, loader: FallbackLoader) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.loader = Arc::new(loader);
        state.cell = Arc::new(OnceCell::new());
        tracing::info!("Order store sources replaced");
    }

    /// Whether a dataset is cached
    pub fn is_loaded(&self) -> bool {
        self.snapshot().1.initialized()
    }

    /// How many times the fallback chain has run
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderQuery for InMemoryOrderStore {
    async fn get_page(
        &self,
        page: usize,
        page_size: usize,
        filters: &FilterSpec,
    ) -> PageResult<Record> {
        let dataset = self.initialize().await;
        let filtered = filter::apply(&dataset.records, filters);
        paginate(&filtered, page, page_size).map(|record| record.clone())
    }

    async fn get_statistics(&self, filters: &FilterSpec) -> Statistics {
        let dataset = self.initialize().await;
        let filtered = filter::apply(&dataset.records, filters);
        stats::aggregate(&filtered, &self.stats)
    }

    async fn get_chart_data(&self, filters: &FilterSpec) -> ChartData {
        let dataset = self.initialize().await;
        let filtered = filter::apply(&dataset.records, filters);
        stats::chart_data(&filtered, &self.stats)
    }

    async fn invalidate(&self) {
        self.reset();
    }

    async fn status(&self) -> StoreStatus {
        let (_, cell) = self.snapshot();
        let dataset = cell.get();
        StoreStatus {
            loaded: dataset.is_some(),
            loading: self.in_flight.load(Ordering::SeqCst) > 0,
            record_count: dataset.map_or(0, |d| d.records.len()),
            source: dataset.map(|d| d.source.clone()),
            loaded_at: dataset.map(|d| d.loaded_at),
        }
    }
}
