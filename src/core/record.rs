//! Order record type

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Column order of the CSV schema
pub const COLUMNS: [&str; 12] = [
    "order_id",
    "date",
    "time",
    "item_name",
    "item_type",
    "transaction_amount",
    "order_type",
    "customer_id",
    "taste_rating",
    "delivery_speed_rating",
    "environment_rating",
    "service_rating",
];

/// Date layouts seen in exported datasets, tried in order
const DATE_FORMATS: [&str; 4] = ["%m-%d-%Y", "%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// One order transaction with its ratings
///
/// Records are immutable once parsed. Text fields that were absent in the
/// source are empty strings; numeric fields that were absent are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub order_id: u64,
    /// Kept as the original string; see [`Record::parsed_date`]
    pub date: String,
    pub time: String,
    pub item_name: String,
    pub item_type: String,
    pub transaction_amount: Option<f64>,
    pub order_type: String,
    pub customer_id: String,
    pub taste_rating: Option<u8>,
    pub delivery_speed_rating: Option<u8>,
    pub environment_rating: Option<u8>,
    pub service_rating: Option<u8>,
}

impl Record {
    /// Create a record with the given id and every other field empty
    pub fn new(order_id: u64) -> Self {
        Self {
            order_id,
            date: String::new(),
            time: String::new(),
            item_name: String::new(),
            item_type: String::new(),
            transaction_amount: None,
            order_type: String::new(),
            customer_id: String::new(),
            taste_rating: None,
            delivery_speed_rating: None,
            environment_rating: None,
            service_rating: None,
        }
    }

    /// The four rating fields, in column order
    pub fn ratings(&self) -> [Option<u8>; 4] {
        [
            self.taste_rating,
            self.delivery_speed_rating,
            self.environment_rating,
            self.service_rating,
        ]
    }

    /// Whether `order_type` is one of the given delivery labels (case-insensitive)
    pub fn is_delivery(&self, delivery_labels: &[String]) -> bool {
        let order_type = self.order_type.to_lowercase();
        delivery_labels
            .iter()
            .any(|label| label.to_lowercase() == order_type)
    }

    /// Check the soft domain convention on ratings
    ///
    /// Delivery orders carry no environment rating and dine-in orders carry
    /// no delivery-speed rating. The parser does not enforce this; it only
    /// counts violations.
    pub fn follows_rating_convention(&self, delivery_labels: &[String]) -> bool {
        if self.is_delivery(delivery_labels) {
            self.environment_rating.is_none()
        } else {
            self.delivery_speed_rating.is_none()
        }
    }

    /// Parse `date` against the known layouts
    ///
    /// Month-first layouts win over day-first ones, so `03-04-2022` is March 4th.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
    }

    /// Parse `time` as `HH:MM`
    pub fn parsed_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()
    }
}
