//! Object storage for workbooks and dashboard documents
//!
//! The pipeline reads workbook bytes from, and writes encoded documents to, a
//! `DocumentStore`. Failures are returned as-is; nothing here retries.
//! Concurrent writers to the same name race; the last write wins.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use pmdash_core::StorageError;
use tempfile::NamedTempFile;

/// Named byte objects
pub trait DocumentStore: Send + Sync {
    fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Fails with `StorageError::NotFound` when `name` does not exist
    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Replace the object wholesale
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Reject names that could escape the store root
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ============================================================================
// Filesystem
// ============================================================================

/// Directory-backed store.
///
/// Writes land in a temporary file next to the target and are renamed into
/// place, so readers never see a half-written object. The temporary file is
/// removed on every failure path.
#[derive(Clone, Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

fn io_error(name: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        name: name.to_string(),
        source,
    }
}

impl DocumentStore for FsStore {
    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.path_of(name)?;
        path.try_exists().map_err(|e| io_error(name, e))
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_of(name)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => io_error(name, e),
        })
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_of(name)?;
        std::fs::create_dir_all(&self.root).map_err(|e| io_error(name, e))?;

        let mut temp = NamedTempFile::new_in(&self.root).map_err(|e| io_error(name, e))?;
        temp.write_all(bytes).map_err(|e| io_error(name, e))?;
        temp.as_file().sync_all().map_err(|e| io_error(name, e))?;
        temp.persist(&path).map_err(|e| io_error(name, e.error))?;

        tracing::debug!(object = %name, bytes = bytes.len(), path = %path.display(), "object written");
        Ok(())
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        validate_name(name)?;
        let objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(objects.contains_key(name))
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        validate_name(name)?;
        let objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        objects
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        validate_name(name)?;
        let mut objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        objects.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        (**self).exists(name)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        (**self).read(name)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write(name, bytes)
    }
}
