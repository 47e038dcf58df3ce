//! # pmdash-store
//!
//! Where dashboard documents live between conversions.
//!
//! This crate provides:
//! - `DocumentStore`, with filesystem and in-memory backends
//! - `DocumentCache`, an explicit cache owned by the caller
//! - `SourceChain`, ordered fallback across cache, store, workbook and snapshot
//! - `DashboardService`, the upload/refresh/load flows
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pmdash_engine::Converter;
//! use pmdash_store::{DashboardService, FsStore};
//!
//! let service = DashboardService::new(Arc::new(FsStore::new("data")), Converter::new());
//! let report = service.upload("Dasbord Data Input 2.xlsx", &bytes)?;
//! println!("{} activities", report.total_activities);
//! ```

pub mod cache;
pub mod service;
pub mod source;
pub mod store;

pub use cache::{CachedDocument, DocumentCache};
pub use service::{
    is_workbook_name, DashboardService, ServiceError, UploadReport, DEFAULT_DOCUMENT,
    DEFAULT_WORKBOOK,
};
pub use source::{
    CacheSource, DataSource, Fetched, SnapshotSource, SourceChain, StoredDocumentSource,
    WorkbookSource,
};
pub use store::{validate_name, DocumentStore, FsStore, MemoryStore};
