//! Explicit document cache
//!
//! Owned by whoever serves the dashboard and shared by handle. Publishing a
//! new document replaces the entry; `invalidate` drops it so the next fetch
//! falls through to the remaining data sources.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use pmdash_core::DashboardDocument;

/// A cached document and where it came from
#[derive(Clone, Debug, PartialEq)]
pub struct CachedDocument {
    pub document: DashboardDocument,
    /// Name of the data source that produced the document
    pub origin: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct DocumentCache {
    entry: RwLock<Option<CachedDocument>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<DashboardDocument> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| cached.document.clone())
    }

    pub fn entry(&self) -> Option<CachedDocument> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn put(&self, document: DashboardDocument, origin: impl Into<String>) {
        let origin = origin.into();
        tracing::debug!(%origin, "document cached");
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(CachedDocument {
            document,
            origin,
            cached_at: Utc::now(),
        });
    }

    pub fn invalidate(&self) {
        tracing::debug!("document cache invalidated");
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
