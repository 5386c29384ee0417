//! Typed errors for the decode and load pipeline
//!
//! None of these errors escape [`InMemoryOrderStore::initialize`]: every
//! failure is caught by the fallback chain and logged. They are public so
//! that sources, codecs and parsers can be used and tested on their own.
//!
//! # Error Categories
//!
//! - [`DecodeError`]: the blob could not be turned back into a payload
//! - [`HeaderError`]: the payload has no usable header row (fatal for a source)
//! - [`ParseError`]: a single row was rejected (the row is dropped)
//! - [`DataError`]: what a fallback stage reports when it gives up
//!
//! [`InMemoryOrderStore::initialize`]: crate::storage::InMemoryOrderStore::initialize

use thiserror::Error;

/// Errors raised while reversing the transport encoding of a dataset
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The base64 armor layer is malformed
    #[error("invalid base64 armor: {0}")]
    Armor(String),

    /// The armored bytes are not valid UTF-8
    #[error("decoded payload is not valid UTF-8: {0}")]
    Utf8(String),

    /// The payload looked like JSON but could not be parsed
    #[error("invalid JSON payload: {0}")]
    Json(String),
}

/// Errors that make a whole payload unusable
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// No header line at all
    #[error("payload is empty")]
    Empty,

    /// The header has no `order_id` column
    #[error("header is missing required column '{0}'")]
    MissingColumn(String),

    /// The same column appears twice
    #[error("header has duplicate column '{0}'")]
    DuplicateColumn(String),
}

/// A single rejected row
///
/// `line` is 1-based and counts the header line, so it matches what an
/// editor shows for CSV payloads. For JSON payloads it is the 1-based
/// position of the object in the array.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Failure of one stage of the fallback chain
#[derive(Debug, Error)]
pub enum DataError {
    /// The blob could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The payload has a malformed header
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// The resource could not be fetched
    #[error("resource '{source_name}' unavailable: {reason}")]
    ResourceUnavailable { source_name: String, reason: String },
}

impl DataError {
    /// Shorthand for a fetch failure
    pub fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        DataError::ResourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DataError::Decode(_) => "DECODE_ERROR",
            DataError::Header(_) => "HEADER_ERROR",
            DataError::ResourceUnavailable { .. } => "RESOURCE_UNAVAILABLE",
        }
    }
}
