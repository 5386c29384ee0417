//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use orderboard::core::DataError;
use orderboard::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const HEADER: &str = "order_id,date,time,item_name,item_type,transaction_amount,order_type,customer_id,taste_rating,delivery_speed_rating,environment_rating,service_rating";

/// Source that counts fetches and simulates network latency
pub struct CountingSource {
    body: Result<String, String>,
    delay: Duration,
    fetches: AtomicUsize,
}

impl CountingSource {
    pub fn ok(body: impl Into<String>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            body: Ok(body.into()),
            delay,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn failing(reason: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            body: Err(reason.into()),
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for CountingSource {
    fn describe(&self) -> String {
        "counting".to_string()
    }

    async fn fetch(&self) -> Result<String, DataError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.body
            .clone()
            .map_err(|reason| DataError::unavailable("counting", reason))
    }
}

pub fn labels() -> Vec<String> {
    StatsConfig::default().delivery_labels
}

/// Loader with a single plain stage over `source`
pub fn plain_loader(source: Arc<CountingSource>) -> FallbackLoader {
    FallbackLoader::new(
        vec![SourceStage::new("plain", source, SourceFormat::Plain)],
        Parser::default(),
        labels(),
    )
}

/// CSV payload with `n` sequential orders
pub fn csv_with(n: u64) -> String {
    let mut text = HEADER.to_string();
    for id in 1..=n {
        let order_type = if id % 2 == 0 { "堂食" } else { "外卖" };
        text.push_str(&format!(
            "\n{id},03-13-2022,12:00,item-{},主食,{}.5,{order_type},CUST_{id:05},4,,,",
            id % 7,
            id
        ));
    }
    text.push('\n');
    text
}

/// The two-order delivery scenario
pub fn two_delivery_orders() -> Vec<Record> {
    let mut first = Record::new(1);
    first.transaction_amount = Some(35.0);
    first.order_type = "delivery".to_string();
    first.item_name = "干煸豆角".to_string();
    first.taste_rating = Some(5);
    first.delivery_speed_rating = Some(5);

    let mut second = Record::new(2);
    second.transaction_amount = Some(38.0);
    second.order_type = "delivery".to_string();
    second.item_name = "鱼香肉丝".to_string();
    second.taste_rating = Some(4);

    vec![first, second]
}
