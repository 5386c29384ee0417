//! Built-in records served when every dataset source fails

use crate::core::record::Record;

/// Stage name reported when the built-in records are in use
pub const BUILTIN_SOURCE: &str = "builtin";

/// The last link of the fallback chain
pub fn default_records() -> Vec<Record> {
    vec![
        Record {
            order_id: 1,
            date: "03-13-2022".to_string(),
            time: "21:04".to_string(),
            item_name: "干煸豆角".to_string(),
            item_type: "主食".to_string(),
            transaction_amount: Some(35.0),
            order_type: "外卖".to_string(),
            customer_id: "CUST_19833".to_string(),
            taste_rating: Some(5),
            delivery_speed_rating: Some(5),
            environment_rating: None,
            service_rating: None,
        },
        Record {
            order_id: 2,
            date: "03-13-2022".to_string(),
            time: "12:30".to_string(),
            item_name: "鱼香肉丝".to_string(),
            item_type: "主食".to_string(),
            transaction_amount: Some(38.0),
            order_type: "堂食".to_string(),
            customer_id: "CUST_20417".to_string(),
            taste_rating: Some(4),
            delivery_speed_rating: None,
            environment_rating: Some(4),
            service_rating: Some(5),
        },
    ]
}
