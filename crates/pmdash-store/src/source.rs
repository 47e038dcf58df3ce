//! Ordered data sources for the dashboard document
//!
//! Each source either yields a document or nothing. A `SourceChain` asks its
//! sources in order and stops at the first one that yields; if none does,
//! the caller shows "no data available".

use std::path::PathBuf;
use std::sync::Arc;

use pmdash_core::{DashboardDocument, StorageError};
use pmdash_engine::{from_json, Converter};

use crate::cache::DocumentCache;
use crate::store::DocumentStore;

/// A place a dashboard document can be fetched from
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// The document, or `None` if this source has nothing usable
    fn try_fetch(&self) -> Option<DashboardDocument>;
}

fn log_miss(source: &str, err: &dyn std::fmt::Display) {
    tracing::warn!(source, "data source failed: {}", err);
}

// ============================================================================
// Sources
// ============================================================================

/// The in-process cache
pub struct CacheSource {
    cache: Arc<DocumentCache>,
}

impl CacheSource {
    pub fn new(cache: Arc<DocumentCache>) -> Self {
        Self { cache }
    }
}

impl DataSource for CacheSource {
    fn name(&self) -> &str {
        "cache"
    }

    fn try_fetch(&self) -> Option<DashboardDocument> {
        self.cache.get()
    }
}

/// A persisted JSON document
pub struct StoredDocumentSource {
    store: Arc<dyn DocumentStore>,
    object: String,
}

impl StoredDocumentSource {
    pub fn new(store: Arc<dyn DocumentStore>, object: impl Into<String>) -> Self {
        Self {
            store,
            object: object.into(),
        }
    }
}

impl DataSource for StoredDocumentSource {
    fn name(&self) -> &str {
        "stored-document"
    }

    fn try_fetch(&self) -> Option<DashboardDocument> {
        let bytes = match self.store.read(&self.object) {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return None,
            Err(e) => {
                log_miss(self.name(), &e);
                return None;
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        from_json(&text)
            .map_err(|e| log_miss(self.name(), &e))
            .ok()
    }
}

/// A stored workbook, converted on every fetch
pub struct WorkbookSource {
    store: Arc<dyn DocumentStore>,
    object: String,
    converter: Converter,
}

impl WorkbookSource {
    pub fn new(store: Arc<dyn DocumentStore>, object: impl Into<String>, converter: Converter) -> Self {
        Self {
            store,
            object: object.into(),
            converter,
        }
    }
}

impl DataSource for WorkbookSource {
    fn name(&self) -> &str {
        "workbook"
    }

    fn try_fetch(&self) -> Option<DashboardDocument> {
        let bytes = match self.store.read(&self.object) {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return None,
            Err(e) => {
                log_miss(self.name(), &e);
                return None;
            }
        };
        self.converter
            .convert(&bytes)
            .map_err(|e| log_miss(self.name(), &e))
            .ok()
    }
}

/// A JSON snapshot on the local filesystem
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn try_fetch(&self) -> Option<DashboardDocument> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log_miss(self.name(), &e);
                return None;
            }
        };
        from_json(&text)
            .map_err(|e| log_miss(self.name(), &e))
            .ok()
    }
}

// ============================================================================
// Chain
// ============================================================================

/// A document and the name of the source that produced it
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched {
    pub document: DashboardDocument,
    pub source: String,
}

/// Sources tried in order until one yields a document
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn DataSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; it is tried after every source added before it
    pub fn with(mut self, source: impl DataSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn DataSource>) {
        self.sources.push(source);
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn fetch(&self) -> Option<Fetched> {
        for source in &self.sources {
            if let Some(document) = source.try_fetch() {
                tracing::debug!(source = source.name(), "document fetched");
                return Some(Fetched {
                    document,
                    source: source.name().to_string(),
                });
            }
            tracing::debug!(source = source.name(), "source had no document");
        }
        None
    }
}
