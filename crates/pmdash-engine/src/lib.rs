//! # pmdash-engine
//!
//! Turns extracted workbook records into the dashboard document.
//!
//! This crate provides:
//! - Phase aggregation in first-seen order
//! - Overview, support and risk counters
//! - Time progress against a fixed project window
//! - Document assembly and JSON encoding
//! - `Converter`, the whole pipeline from workbook bytes to document
//!
//! ## Example
//!
//! ```rust,ignore
//! use pmdash_engine::Converter;
//!
//! let bytes = std::fs::read("Dasbord Data Input.xlsx")?;
//! let json = Converter::new().convert_to_json(&bytes, true)?;
//! ```

pub mod assemble;
pub mod overview;
pub mod phases;
pub mod timeline;

pub use assemble::{assemble, ensure_finite, from_json, to_json};
pub use overview::{overview_stats, risk_summary, support_summary};
pub use phases::{aggregate_phases, build_phase};
pub use timeline::{apply_override, TimelineCalculator};

use chrono::{NaiveDate, Utc};
use pmdash_core::{ConvertError, DashboardDocument, ProjectWindow};
use pmdash_parser::{classify, extract, read_workbook, RawSheet};

/// Pipeline stage. A run only moves forward; any error ends it in `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Reading,
    Classifying,
    Normalizing,
    Aggregating,
    Serializing,
    Done,
    Failed,
}

/// Tracks one conversion run through its stages
#[derive(Debug)]
struct Run {
    stage: Stage,
}

impl Run {
    fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {:?} after {:?}", next, self.stage);
        tracing::debug!(from = ?self.stage, to = ?next, "conversion stage");
        self.stage = next;
    }

    fn check<T>(&mut self, result: Result<T, ConvertError>) -> Result<T, ConvertError> {
        if let Err(e) = &result {
            tracing::warn!(stage = ?self.stage, "conversion failed: {}", e);
            self.stage = Stage::Failed;
        }
        result
    }
}

/// Workbook-to-document converter
#[derive(Clone, Debug, Default)]
pub struct Converter {
    calculator: TimelineCalculator,
    today: Option<NaiveDate>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure time progress against this window
    pub fn window(mut self, window: ProjectWindow) -> Self {
        self.calculator = TimelineCalculator::new(window);
        self
    }

    /// Pin the current date instead of reading the clock
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn current_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Workbook bytes to document
    pub fn convert(&self, bytes: &[u8]) -> Result<DashboardDocument, ConvertError> {
        let mut run = Run::new();
        run.advance(Stage::Reading);
        let sheets = run.check(read_workbook(bytes))?;
        let document = self.convert_in(&mut run, &sheets)?;
        run.advance(Stage::Done);
        Ok(document)
    }

    /// Already-read sheets to document
    pub fn convert_sheets(&self, sheets: &[RawSheet]) -> Result<DashboardDocument, ConvertError> {
        let mut run = Run::new();
        let document = self.convert_in(&mut run, sheets)?;
        run.advance(Stage::Done);
        Ok(document)
    }

    /// Workbook bytes to encoded JSON
    pub fn convert_to_json(&self, bytes: &[u8], pretty: bool) -> Result<String, ConvertError> {
        let mut run = Run::new();
        run.advance(Stage::Reading);
        let sheets = run.check(read_workbook(bytes))?;
        let document = self.convert_in(&mut run, &sheets)?;
        run.advance(Stage::Serializing);
        let json = run.check(to_json(&document, pretty))?;
        run.advance(Stage::Done);
        Ok(json)
    }

    fn convert_in(
        &self,
        run: &mut Run,
        sheets: &[RawSheet],
    ) -> Result<DashboardDocument, ConvertError> {
        run.advance(Stage::Classifying);
        for sheet in sheets {
            match classify(&sheet.name) {
                Some(kind) => tracing::debug!(sheet = %sheet.name, %kind, "sheet recognized"),
                None => tracing::debug!(sheet = %sheet.name, "sheet not recognized"),
            }
        }

        run.advance(Stage::Normalizing);
        let contents = run.check(extract(sheets))?;
        for (name, reason) in &contents.skipped {
            tracing::debug!(sheet = %name, %reason, "sheet skipped");
        }

        run.advance(Stage::Aggregating);
        let document = assemble(contents, &self.calculator, self.current_date());
        run.check(ensure_finite(&document))?;

        tracing::info!(
            activities = document.overview.total_activities,
            completed = document.overview.completed_activities,
            completion = document.overview.completion_percentage,
            phases = document.phases.len(),
            support = document.support.total_support,
            risks = document.risks.total_risks,
            "workbook converted"
        );
        Ok(document)
    }
}
