//! Dataset sources, the fallback loader and the in-memory store

pub mod builtin;
pub mod in_memory;
pub mod loader;
pub mod source;

pub use in_memory::InMemoryOrderStore;
pub use loader::{FallbackLoader, LoadedDataset};
#[cfg(feature = "remote")]
pub use source::HttpSource;
pub use source::{DataSource, FileSource, SourceFormat, SourceStage, StaticSource};
