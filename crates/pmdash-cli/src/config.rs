//! `pmdash.toml` configuration
//!
//! Every field is optional. Without a file the built-in project window and
//! storage names are used.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use pmdash_core::ProjectWindow;
use pmdash_engine::Converter;
use pmdash_store::{DashboardService, FsStore, DEFAULT_DOCUMENT, DEFAULT_WORKBOOK};
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "pmdash.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project: ProjectConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            start: ProjectWindow::DEFAULT_START,
            end: ProjectWindow::DEFAULT_END,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory backing the document store
    pub root: PathBuf,
    /// Object name of the uploaded workbook
    pub workbook: String,
    /// Object name of the published document
    pub document: String,
    /// Local JSON file consulted when the store has nothing
    pub snapshot: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            workbook: DEFAULT_WORKBOOK.to_string(),
            document: DEFAULT_DOCUMENT.to_string(),
            snapshot: None,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        if config.project.end < config.project.start {
            bail!(
                "project end {} is before project start {}",
                config.project.end,
                config.project.start
            );
        }
        Ok(config)
    }

    /// Load `path`, or `pmdash.toml` if present, or the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn window(&self) -> ProjectWindow {
        ProjectWindow::new(self.project.start, self.project.end)
    }

    pub fn converter(&self, today: Option<NaiveDate>) -> Converter {
        let converter = Converter::new().window(self.window());
        match today {
            Some(today) => converter.today(today),
            None => converter,
        }
    }

    pub fn service(&self, today: Option<NaiveDate>) -> DashboardService {
        let store = FsStore::new(&self.storage.root);
        let service = DashboardService::new(Arc::new(store), self.converter(today))
            .workbook_name(&self.storage.workbook)
            .document_name(&self.storage.document);
        match &self.storage.snapshot {
            Some(snapshot) => service.snapshot(snapshot),
            None => service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(Config::default().window(), ProjectWindow::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::parse(
            r#"
            [project]
            start = "2025-01-01"

            [storage]
            root = "/srv/dashboard"
            "#,
        )
        .unwrap();

        assert_eq!(config.project.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(config.project.end, ProjectWindow::DEFAULT_END);
        assert_eq!(config.storage.root, PathBuf::from("/srv/dashboard"));
        assert_eq!(config.storage.document, DEFAULT_DOCUMENT);
        assert_eq!(config.storage.snapshot, None);
    }

    #[test]
    fn reversed_window_is_rejected() {
        let err = Config::parse("[project]\nstart = \"2026-01-01\"\nend = \"2025-01-01\"\n").unwrap_err();
        assert!(err.to_string().contains("before project start"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[storage]\nbucket = \"x\"\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
