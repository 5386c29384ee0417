//! Core module containing the record model and the pure query pipeline

pub mod codec;
pub mod error;
pub mod filter;
pub mod parser;
pub mod query;
pub mod record;
pub mod service;
pub mod stats;

pub use codec::Codec;
pub use error::{DataError, DecodeError, HeaderError, ParseError};
pub use filter::FilterSpec;
pub use parser::{ParseOutcome, Parser, RatingDecoder};
pub use query::{OrderQueryParams, PageInfo, PageResult, paginate};
pub use record::Record;
pub use service::{OrderQuery, StoreStatus};
pub use stats::{ChartData, PopularItem, Statistics};
