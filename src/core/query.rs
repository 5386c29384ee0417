//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

use crate::core::filter::FilterSpec;

/// Query parameters for the order listing
///
/// Extracted from URL query strings. Field names follow the dashboard's
/// camelCase convention.
///
/// # Example
/// ```text
/// GET /orders?page=2&pageSize=50
/// GET /orders?orderType=外卖&searchText=豆角
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderQueryParams {
    /// Page number (starts at 1)
    pub page: Option<usize>,

    /// Number of records per page; the configured default when absent
    pub page_size: Option<usize>,

    /// Exact match on order type
    pub order_type: Option<String>,

    /// Exact match on item type
    pub item_type: Option<String>,

    /// Substring of item name or customer id
    pub search_text: Option<String>,
}

impl OrderQueryParams {
    /// Get page number; absent means 1, zero is kept and yields an empty page
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// Get page size, falling back to `default` and clamped to `[1, max]`
    pub fn page_size(&self, default: usize, max: usize) -> usize {
        self.page_size.unwrap_or(default).clamp(1, max.max(1))
    }

    /// The filter part of the query
    pub fn filters(&self) -> FilterSpec {
        FilterSpec {
            order_type: self.order_type.clone(),
            item_type: self.item_type.clone(),
            search_text: self.search_text.clone(),
        }
    }
}

/// One page of results with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    /// The records on this page, at most `page_size` of them
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PageInfo,
}

impl<T> PageResult<T> {
    /// Convert the page items, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Requested page number (1-based, reported as requested)
    pub current_page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after filters)
    pub total_count: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a previous page
    pub has_prev: bool,

    /// Whether there is a next page
    pub has_next: bool,
}

impl PageInfo {
    /// Create pagination metadata from calculation
    pub fn new(current_page: usize, page_size: usize, total_count: usize) -> Self {
        // Ensure page_size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size);

        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
            has_prev: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

/// Slice one page out of `items`
///
/// `page` is 1-based. Page 0 or a page past the end yields no data, while
/// the metadata still describes the full range.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> PageResult<T> {
    let pagination = PageInfo::new(page, page_size, items.len());

    let data = if page == 0 {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(pagination.page_size);
        let end = start.saturating_add(pagination.page_size).min(items.len());
        items.get(start..end).map(<[T]>::to_vec).unwrap_or_default()
    };

    PageResult { data, pagination }
}
