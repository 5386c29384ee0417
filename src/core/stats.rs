//! Aggregate statistics and chart series over a record set
//!
//! Everything here is recomputed per call and never stored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::core::record::Record;

/// Dashboard headline numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_orders: usize,
    /// Plain sum of `transaction_amount`, missing amounts count as zero
    pub total_revenue: f64,
    /// Mean over every present rating, one decimal
    pub avg_rating: f64,
    /// Percentage of delivery orders, one decimal
    pub delivery_ratio: f64,
    pub popular_items: Vec<PopularItem>,
}

/// An item name and how often it was ordered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularItem {
    pub item_name: String,
    pub count: usize,
}

/// Series backing the dashboard charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Revenue per item type, in first-seen order
    pub sales_by_item_type: IndexMap<String, f64>,
    /// Count of ratings with value 1..=5, index 0 holds the 1-star count
    pub rating_histogram: [usize; 5],
    /// How many records the series were computed over
    pub sample_size: usize,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute the headline statistics
///
/// `popular_items` is computed over the first `sample_cap` records only,
/// which trades exactness for speed on large sets.
pub fn aggregate(records: &[&Record], config: &StatsConfig) -> Statistics {
    let total_orders = records.len();
    let total_revenue: f64 = records
        .iter()
        .map(|r| r.transaction_amount.unwrap_or(0.0))
        .sum();

    let (rating_sum, rating_count) = records
        .iter()
        .flat_map(|r| r.ratings())
        .flatten()
        .fold((0u64, 0u64), |(sum, count), rating| {
            (sum + u64::from(rating), count + 1)
        });
    let avg_rating = if rating_count == 0 {
        0.0
    } else {
        round1(rating_sum as f64 / rating_count as f64)
    };

    let delivery_orders = records
        .iter()
        .filter(|r| r.is_delivery(&config.delivery_labels))
        .count();
    let delivery_ratio = if total_orders == 0 {
        0.0
    } else {
        round1(delivery_orders as f64 * 100.0 / total_orders as f64)
    };

    Statistics {
        total_orders,
        total_revenue,
        avg_rating,
        delivery_ratio,
        popular_items: popular_items(records, config.top_k, config.sample_cap),
    }
}

/// Top `k` item names by frequency over the first `sample_cap` records
///
/// Ties keep the order in which names were first seen. Empty names are not counted.
pub fn popular_items(records: &[&Record], k: usize, sample_cap: usize) -> Vec<PopularItem> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in records.iter().take(sample_cap) {
        if !record.item_name.is_empty() {
            *counts.entry(record.item_name.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(k)
        .map(|(name, count)| PopularItem {
            item_name: name.to_string(),
            count,
        })
        .collect()
}

/// Compute chart series over the first `config.chart_sample` records
pub fn chart_data(records: &[&Record], config: &StatsConfig) -> ChartData {
    let sample = &records[..records.len().min(config.chart_sample)];

    let mut sales_by_item_type: IndexMap<String, f64> = IndexMap::new();
    let mut rating_histogram = [0usize; 5];

    for record in sample {
        *sales_by_item_type
            .entry(record.item_type.clone())
            .or_insert(0.0) += record.transaction_amount.unwrap_or(0.0);

        for rating in record.ratings().into_iter().flatten() {
            if (1..=5).contains(&rating) {
                rating_histogram[usize::from(rating) - 1] += 1;
            }
        }
    }

    ChartData {
        sales_by_item_type,
        rating_histogram,
        sample_size: sample.len(),
    }
}
