//! # pmdash-parser
//!
//! Reads a project-tracking workbook and turns its sheets into records.
//!
//! This crate provides:
//! - Tabular reader over calamine (`read_workbook`)
//! - Sheet classifier by bilingual name keywords (`classify`)
//! - Row normalizer with per-field Arabic/English header fallback
//! - `extract`, which runs the three over a whole workbook
//!
//! ## Example
//!
//! ```rust
//! use pmdash_parser::{extract, Cell, RawSheet};
//!
//! let sheet = RawSheet::new(
//!     "Activities",
//!     vec![
//!         vec![Cell::Text("Phase".into()), Cell::Text("Status".into())],
//!         vec![Cell::Text("Design".into()), Cell::Text("completed".into())],
//!     ],
//! );
//! let contents = extract(&[sheet]).unwrap();
//! assert_eq!(contents.activities.len(), 1);
//! ```

pub mod classify;
pub mod normalize;
pub mod workbook;

pub use classify::{classify, SheetKind};
pub use normalize::{
    is_blank_row, normalize_activity, normalize_risk, normalize_support, Column, HeaderMap,
    UNSPECIFIED_PHASE,
};
pub use workbook::{read_workbook, serial_to_date, Cell, RawSheet};

use chrono::NaiveDate;
use pmdash_core::{ActivityRecord, ConvertError, RiskRecord, SupportRecord};

/// Explicit timeline values from the second row of a timeline sheet
/// (columns: time %, activity %, start date, current date).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineOverride {
    pub time_progress: Option<f64>,
    pub activity_progress: Option<f64>,
    pub project_start: Option<NaiveDate>,
    pub current_date: Option<NaiveDate>,
}

impl TimelineOverride {
    /// Read the override row of a timeline sheet. `None` if the sheet has
    /// no second row or that row is blank.
    pub fn from_sheet(sheet: &RawSheet) -> Option<Self> {
        let row = sheet.rows.get(1)?;
        if is_blank_row(row) {
            return None;
        }
        let cell = |idx: usize| row.get(idx).filter(|c| !c.is_missing());
        Some(Self {
            time_progress: cell(0).and_then(Cell::as_number),
            activity_progress: cell(1).and_then(Cell::as_number),
            project_start: cell(2).and_then(Cell::as_date),
            current_date: cell(3).and_then(Cell::as_date),
        })
    }
}

/// Records extracted from the recognized sheets of one workbook
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkbookContents {
    /// Activity rows of every activities sheet, in workbook and row order
    pub activities: Vec<ActivityRecord>,
    pub support: Vec<SupportRecord>,
    pub risks: Vec<RiskRecord>,
    /// Override from the last timeline sheet that supplied one
    pub timeline: Option<TimelineOverride>,
    /// Sheets that were processed, with their kind
    pub processed: Vec<(String, SheetKind)>,
    /// Sheets that were skipped, with the reason
    pub skipped: Vec<(String, String)>,
}

/// Classify and normalize every sheet.
///
/// Unrecognized and header-less sheets are skipped. Fails with
/// `ConvertError::Validation` when no sheet is usable.
pub fn extract(sheets: &[RawSheet]) -> Result<WorkbookContents, ConvertError> {
    if sheets.is_empty() {
        return Err(ConvertError::Validation("workbook contains no sheets".into()));
    }

    let mut contents = WorkbookContents::default();

    for sheet in sheets {
        let Some(kind) = classify(&sheet.name) else {
            tracing::debug!(sheet = %sheet.name, "ignoring unrecognized sheet");
            contents
                .skipped
                .push((sheet.name.clone(), "unrecognized sheet name".into()));
            continue;
        };

        let Some(header_row) = sheet.header_row() else {
            if sheets.len() == 1 {
                return Err(ConvertError::Validation(format!(
                    "sheet '{}' has no header row",
                    sheet.name
                )));
            }
            tracing::warn!("Skipping sheet '{}': no header row", sheet.name);
            contents
                .skipped
                .push((sheet.name.clone(), "no header row".into()));
            continue;
        };

        let header = HeaderMap::from_row(header_row);
        let rows = sheet.data_rows().iter().filter(|row| !is_blank_row(row));

        tracing::debug!(sheet = %sheet.name, %kind, "normalizing sheet");
        match kind {
            SheetKind::Activities => contents
                .activities
                .extend(rows.map(|row| normalize_activity(&header, row))),
            SheetKind::Support => contents
                .support
                .extend(rows.map(|row| normalize_support(&header, row))),
            SheetKind::Risks => contents
                .risks
                .extend(rows.map(|row| normalize_risk(&header, row))),
            SheetKind::Timeline => {
                if let Some(timeline) = TimelineOverride::from_sheet(sheet) {
                    contents.timeline = Some(timeline);
                }
            }
        }
        contents.processed.push((sheet.name.clone(), kind));
    }

    if contents.processed.is_empty() {
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        return Err(ConvertError::Validation(format!(
            "no usable sheets (expected activities/أنشطة, support/دعم, risks/مخاطر or timeline/جدول), found {:?}",
            names
        )));
    }

    Ok(contents)
}

/// Read workbook bytes and extract their records
pub fn parse_workbook(bytes: &[u8]) -> Result<WorkbookContents, ConvertError> {
    let sheets = read_workbook(bytes)?;
    extract(&sheets)
}
