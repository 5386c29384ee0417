//! Fallback chain for loading the record set
//!
//! Stages are tried in order: encoded source, plain source, then the
//! built-in records. A stage fails when its resource is unavailable, its
//! blob does not decode, or its header is unusable. Bad rows never fail a
//! stage; they are dropped and counted.

use chrono::{DateTime, Utc};

use crate::config::OrderboardConfig;
use crate::core::codec::Codec;
use crate::core::error::DataError;
use crate::core::parser::{Parser, RatingDecoder};
use crate::core::record::Record;
use crate::storage::builtin::{BUILTIN_SOURCE, default_records};
use crate::storage::source::{SourceFormat, SourceStage, from_location};

/// A record set together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<Record>,
    /// Name of the stage that produced the records
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

/// Ordered list of stages ending in the built-in records
#[derive(Debug, Clone)]
pub struct FallbackLoader {
    stages: Vec<SourceStage>,
    parser: Parser,
    delivery_labels: Vec<String>,
}

impl FallbackLoader {
    pub fn new(stages: Vec<SourceStage>, parser: Parser, delivery_labels: Vec<String>) -> Self {
        Self {
            stages,
            parser,
            delivery_labels,
        }
    }

    /// A loader with no external stages; it always yields the built-in records
    pub fn builtin_only() -> Self {
        Self::new(Vec::new(), Parser::default(), Vec::new())
    }

    /// Build the chain described by the configuration
    pub fn from_config(config: &OrderboardConfig) -> Self {
        let mut stages = Vec::new();
        if let Some(location) = &config.sources.encoded {
            tracing::debug!(location = %location.describe(), "Configured encoded source");
            stages.push(SourceStage::new(
                "encoded",
                from_location(location),
                SourceFormat::Encoded(Codec::new(config.codec.armor)),
            ));
        }
        if let Some(location) = &config.sources.plain {
            tracing::debug!(location = %location.describe(), "Configured plain source");
            stages.push(SourceStage::new(
                "plain",
                from_location(location),
                SourceFormat::Plain,
            ));
        }

        Self::new(
            stages,
            Parser::new(RatingDecoder::from(&config.parser)),
            config.stats.delivery_labels.clone(),
        )
    }

    pub fn stages(&self) -> &[SourceStage] {
        &self.stages
    }

    /// Run the chain; never fails
    pub async fn load(&self) -> LoadedDataset {
        for stage in &self.stages {
            let armored = matches!(stage.format, SourceFormat::Encoded(codec) if codec.is_armored());
            tracing::debug!(
                stage = %stage.name,
                source = %stage.source.describe(),
                armored,
                "Loading dataset"
            );

            match self.load_stage(stage).await {
                Ok(records) => {
                    tracing::info!(
                        stage = %stage.name,
                        records = records.len(),
                        "Dataset loaded"
                    );
                    return LoadedDataset {
                        records,
                        source: stage.name.clone(),
                        loaded_at: Utc::now(),
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        stage = %stage.name,
                        code = e.error_code(),
                        error = %e,
                        "Dataset stage failed, falling back"
                    );
                }
            }
        }

        tracing::warn!("All dataset sources failed, serving built-in records");
        LoadedDataset {
            records: default_records(),
            source: BUILTIN_SOURCE.to_string(),
            loaded_at: Utc::now(),
        }
    }

    async fn load_stage(&self, stage: &SourceStage) -> Result<Vec<Record>, DataError> {
        let payload = stage.payload().await?;
        let outcome = self.parser.parse(&payload)?;

        for rejected in &outcome.rejected {
            tracing::debug!(stage = %stage.name, line = rejected.line, reason = %rejected.reason, "Row dropped");
        }
        if !outcome.rejected.is_empty() {
            tracing::warn!(
                stage = %stage.name,
                dropped = outcome.rejected.len(),
                "Dropped malformed rows"
            );
        }

        let violations = outcome
            .records
            .iter()
            .filter(|r| !r.follows_rating_convention(&self.delivery_labels))
            .count();
        if violations > 0 {
            tracing::warn!(
                stage = %stage.name,
                records = violations,
                "Records carry a rating their order type should not have"
            );
        }

        Ok(outcome.records)
    }
}
