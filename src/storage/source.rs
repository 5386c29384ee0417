//! Dataset sources
//!
//! A [`DataSource`] only fetches text. What the text means (encoded blob or
//! plain payload) is decided by the [`SourceStage`] that wraps it.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SourceLocation;
use crate::core::codec::Codec;
use crate::core::error::DataError;

/// Something that can produce the raw text of a dataset
///
/// Fetching is the only point where loading suspends.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Location shown in logs
    fn describe(&self) -> String;

    /// Fetch the raw text
    async fn fetch(&self) -> Result<String, DataError>;
}

/// Reads a local file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, DataError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DataError::unavailable(self.describe(), e))
    }
}

/// Fetches a URL over HTTP
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

#[cfg(feature = "remote")]
impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "remote")]
#[async_trait]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, DataError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DataError::unavailable(&self.url, e))?;

        response
            .text()
            .await
            .map_err(|e| DataError::unavailable(&self.url, e))
    }
}

/// Serves a fixed string
///
/// Useful for datasets compiled into the binary.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    body: String,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> Result<String, DataError> {
        Ok(self.body.clone())
    }
}

/// A configured location this build cannot fetch
#[derive(Debug, Clone)]
pub struct UnsupportedSource {
    location: String,
    reason: &'static str,
}

impl UnsupportedSource {
    pub fn new(location: impl Into<String>, reason: &'static str) -> Self {
        Self {
            location: location.into(),
            reason,
        }
    }
}

#[async_trait]
impl DataSource for UnsupportedSource {
    fn describe(&self) -> String {
        self.location.clone()
    }

    async fn fetch(&self) -> Result<String, DataError> {
        Err(DataError::unavailable(&self.location, self.reason))
    }
}

/// Build the source for a configured location
pub fn from_location(location: &SourceLocation) -> Arc<dyn DataSource> {
    match location {
        SourceLocation::File(path) => Arc::new(FileSource::new(path)),
        #[cfg(feature = "remote")]
        SourceLocation::Url(url) => Arc::new(HttpSource::new(url)),
        #[cfg(not(feature = "remote"))]
        SourceLocation::Url(url) => Arc::new(UnsupportedSource::new(
            url.clone(),
            "URL sources need the `remote` feature",
        )),
    }
}

/// How the fetched text is turned into a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Run through the codec first
    Encoded(Codec),
    /// Already a payload
    Plain,
}

/// One link of the fallback chain
#[derive(Clone)]
pub struct SourceStage {
    pub name: String,
    pub source: Arc<dyn DataSource>,
    pub format: SourceFormat,
}

impl SourceStage {
    pub fn new(name: impl Into<String>, source: Arc<dyn DataSource>, format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            source,
            format,
        }
    }

    /// Fetch and decode this stage's payload text
    pub async fn payload(&self) -> Result<String, DataError> {
        let body = self.source.fetch().await?;
        match self.format {
            SourceFormat::Encoded(codec) => Ok(codec.decode(&body)?),
            SourceFormat::Plain => Ok(body),
        }
    }
}

impl std::fmt::Debug for SourceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceStage")
            .field("name", &self.name)
            .field("source", &self.source.describe())
            .field("format", &self.format)
            .finish()
    }
}
