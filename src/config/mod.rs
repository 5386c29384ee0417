//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Where a dataset is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum SourceLocation {
    /// A local file path
    File(String),
    /// An HTTP(S) URL, fetched when the `remote` feature is enabled
    Url(String),
}

impl SourceLocation {
    /// Human-readable location, used in logs and status
    pub fn describe(&self) -> &str {
        match self {
            SourceLocation::File(path) => path,
            SourceLocation::Url(url) => url,
        }
    }
}

/// The two external dataset resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Encoded dataset, tried first
    pub encoded: Option<SourceLocation>,
    /// Plain CSV dataset, tried second
    pub plain: Option<SourceLocation>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            encoded: Some(SourceLocation::File("data/obfuscated_data.txt".to_string())),
            plain: Some(SourceLocation::File("data/orders.csv".to_string())),
        }
    }
}

/// Codec layers for the encoded source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Whether the encoded blob carries a base64 layer
    pub armor: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { armor: true }
    }
}

/// How rating cells are written in the dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingEncoding {
    /// Digits: `4`
    #[default]
    Numeric,
    /// Repeated glyphs: `★★★★`
    Glyph,
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub rating_encoding: RatingEncoding,
    /// The repeated unit when `rating_encoding` is `glyph`
    pub rating_glyph: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            rating_encoding: RatingEncoding::Numeric,
            rating_glyph: "★".to_string(),
        }
    }
}

/// Page size limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_page_sizes"))]
pub struct QueryConfig {
    #[validate(range(min = 1))]
    pub default_page_size: usize,
    #[validate(range(min = 1))]
    pub max_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 1000,
        }
    }
}

fn validate_page_sizes(config: &QueryConfig) -> Result<(), ValidationError> {
    if config.max_page_size < config.default_page_size {
        return Err(ValidationError::new("max_page_size_below_default"));
    }
    Ok(())
}

/// Statistics settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StatsConfig {
    /// How many popular items to report
    #[validate(range(min = 1))]
    pub top_k: usize,
    /// Records considered for popular items
    #[validate(range(min = 1))]
    pub sample_cap: usize,
    /// Records considered for chart series
    #[validate(range(min = 1))]
    pub chart_sample: usize,
    /// `order_type` values counted as delivery (case-insensitive)
    #[validate(length(min = 1))]
    pub delivery_labels: Vec<String>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            sample_cap: 10_000,
            chart_sample: 1000,
            delivery_labels: vec!["外卖".to_string(), "delivery".to_string()],
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderboardConfig {
    pub sources: SourcesConfig,
    pub codec: CodecConfig,
    pub parser: ParserConfig,
    #[validate(nested)]
    pub query: QueryConfig,
    #[validate(nested)]
    pub stats: StatsConfig,
    #[validate(nested)]
    pub server: ServerConfig,
}

impl OrderboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}
