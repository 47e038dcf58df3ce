//! Publishing and loading the dashboard document
//!
//! `DashboardService` ties a `DocumentStore`, a `DocumentCache` and a
//! `Converter` together. Uploads and refreshes write the encoded document to
//! the store first and only then replace the cache entry, so a failed write
//! never leaves the cache ahead of the store.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pmdash_core::{ConvertError, DashboardDocument, StorageError};
use pmdash_engine::{to_json, Converter};
use serde::Serialize;
use thiserror::Error;

use crate::cache::DocumentCache;
use crate::source::{
    CacheSource, Fetched, SnapshotSource, SourceChain, StoredDocumentSource, WorkbookSource,
};
use crate::store::DocumentStore;

/// Object name the uploaded workbook is stored under
pub const DEFAULT_WORKBOOK: &str = "Dasbord Data Input 2.xlsx";

/// Object name the encoded document is stored under
pub const DEFAULT_DOCUMENT: &str = "dashboard_data.json";

/// Publish/load error
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid file '{name}': {reason}")]
    InvalidFile { name: String, reason: String },
}

/// Summary returned after a successful upload
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UploadReport {
    pub total_activities: usize,
    pub completed_activities: usize,
    pub completion_percentage: f64,
    pub total_phases: usize,
    pub total_support: usize,
    pub total_risks: usize,
    pub file_name: String,
    pub file_size: usize,
    pub upload_time: DateTime<Utc>,
}

impl UploadReport {
    fn new(document: &DashboardDocument, file_name: &str, file_size: usize) -> Self {
        Self {
            total_activities: document.overview.total_activities,
            completed_activities: document.overview.completed_activities,
            completion_percentage: document.overview.completion_percentage,
            total_phases: document.phases.len(),
            total_support: document.support.total_support,
            total_risks: document.risks.total_risks,
            file_name: file_name.to_string(),
            file_size,
            upload_time: Utc::now(),
        }
    }
}

/// Whether `file_name` names an `.xlsx` workbook
pub fn is_workbook_name(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

pub struct DashboardService {
    store: Arc<dyn DocumentStore>,
    cache: Arc<DocumentCache>,
    converter: Converter,
    workbook: String,
    document: String,
    snapshot: Option<PathBuf>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DocumentStore>, converter: Converter) -> Self {
        Self {
            store,
            cache: Arc::new(DocumentCache::new()),
            converter,
            workbook: DEFAULT_WORKBOOK.to_string(),
            document: DEFAULT_DOCUMENT.to_string(),
            snapshot: None,
        }
    }

    pub fn workbook_name(mut self, name: impl Into<String>) -> Self {
        self.workbook = name.into();
        self
    }

    pub fn document_name(mut self, name: impl Into<String>) -> Self {
        self.document = name.into();
        self
    }

    /// Fall back to this local JSON file when the store has nothing
    pub fn snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    /// Share an existing cache instead of owning a fresh one
    pub fn with_cache(mut self, cache: Arc<DocumentCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Store a new workbook and publish the document converted from it.
    ///
    /// The workbook is converted before anything is written, so a workbook
    /// that fails to convert leaves the store and cache untouched.
    pub fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<UploadReport, ServiceError> {
        if !is_workbook_name(file_name) {
            return Err(ServiceError::InvalidFile {
                name: file_name.to_string(),
                reason: "only .xlsx workbooks are accepted".to_string(),
            });
        }
        if bytes.is_empty() {
            return Err(ServiceError::InvalidFile {
                name: file_name.to_string(),
                reason: "file is empty".to_string(),
            });
        }

        let document = self.converter.convert(bytes)?;
        self.store.write(&self.workbook, bytes)?;
        self.publish(document.clone(), "upload")?;

        let report = UploadReport::new(&document, file_name, bytes.len());
        tracing::info!(
            file = %file_name,
            bytes = bytes.len(),
            activities = report.total_activities,
            completion = report.completion_percentage,
            "workbook uploaded"
        );
        Ok(report)
    }

    /// Re-convert the stored workbook and publish the result
    pub fn refresh(&self) -> Result<DashboardDocument, ServiceError> {
        let bytes = self.store.read(&self.workbook)?;
        let document = self.converter.convert(&bytes)?;
        self.publish(document.clone(), "refresh")?;
        tracing::info!(
            workbook = %self.workbook,
            activities = document.overview.total_activities,
            "document refreshed"
        );
        Ok(document)
    }

    /// Write the document to the store, then replace the cache entry
    pub fn publish(&self, document: DashboardDocument, origin: &str) -> Result<(), ServiceError> {
        let json = to_json(&document, true)?;
        self.store.write(&self.document, json.as_bytes())?;
        self.cache.put(document, origin);
        Ok(())
    }

    /// The data sources in the order they are consulted
    pub fn sources(&self) -> SourceChain {
        let mut chain = SourceChain::new()
            .with(CacheSource::new(Arc::clone(&self.cache)))
            .with(StoredDocumentSource::new(Arc::clone(&self.store), &self.document))
            .with(WorkbookSource::new(
                Arc::clone(&self.store),
                &self.workbook,
                self.converter.clone(),
            ));
        if let Some(path) = &self.snapshot {
            chain = chain.with(SnapshotSource::new(path));
        }
        chain
    }

    /// The current document, or `None` when no source has one.
    ///
    /// A document found outside the cache is cached for the next call.
    pub fn load(&self) -> Option<Fetched> {
        let fetched = self.sources().fetch()?;
        if fetched.source != "cache" {
            self.cache.put(fetched.document.clone(), fetched.source.as_str());
        }
        Some(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn workbook_names() {
        assert!(is_workbook_name("Dasbord Data Input 2.xlsx"));
        assert!(is_workbook_name("DATA.XLSX"));
        assert!(!is_workbook_name("data.csv"));
        assert!(!is_workbook_name("xlsx"));
        assert!(!is_workbook_name("data.xls"));
    }

    #[test]
    fn upload_rejects_wrong_extension() {
        let service = DashboardService::new(Arc::new(MemoryStore::new()), Converter::new());
        let err = service.upload("data.csv", b"a,b").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidFile { .. }), "got {err:?}");
    }

    #[test]
    fn upload_rejects_empty_file() {
        let service = DashboardService::new(Arc::new(MemoryStore::new()), Converter::new());
        let err = service.upload("data.xlsx", b"").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidFile { .. }), "got {err:?}");
    }

    #[test]
    fn failed_conversion_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service = DashboardService::new(store.clone(), Converter::new());
        let err = service.upload("data.xlsx", b"not a workbook").unwrap_err();
        assert!(matches!(err, ServiceError::Convert(ConvertError::Format(_))), "got {err:?}");
        assert!(store.is_empty());
        assert!(service.cache().is_empty());
    }

    #[test]
    fn refresh_without_workbook_is_not_found() {
        let service = DashboardService::new(Arc::new(MemoryStore::new()), Converter::new());
        let err = service.refresh().unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StorageError::NotFound(_))), "got {err:?}");
    }

    #[test]
    fn load_from_empty_store_is_none() {
        let service = DashboardService::new(Arc::new(MemoryStore::new()), Converter::new());
        assert!(service.load().is_none());
        assert_eq!(service.sources().names(), vec!["cache", "stored-document", "workbook"]);
    }

    #[test]
    fn publish_then_load_hits_cache() {
        let store = Arc::new(MemoryStore::new());
        let service = DashboardService::new(store.clone(), Converter::new());
        let mut doc = DashboardDocument::default();
        doc.overview.total_activities = 9;

        service.publish(doc.clone(), "test").unwrap();
        assert!(store.exists(DEFAULT_DOCUMENT).unwrap());

        let fetched = service.load().unwrap();
        assert_eq!(fetched.source, "cache");
        assert_eq!(fetched.document, doc);
    }
}
