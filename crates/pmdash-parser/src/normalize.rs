//! Row normalizer
//!
//! Rebuilds field-named records from header-aligned rows. Each target field
//! is looked up under its primary (Arabic) header label first and its
//! fallback (English) label second, independently per field.

use pmdash_core::{ActivityRecord, ActivityStatus, RiskRecord, RiskStatus, RiskType, SupportRecord};

use crate::workbook::Cell;

/// Phase label used when a row names no phase
pub const UNSPECIFIED_PHASE: &str = "مرحلة غير محددة";

/// A (primary, fallback) header label pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub primary: &'static str,
    pub fallback: &'static str,
}

const fn column(primary: &'static str, fallback: &'static str) -> Column {
    Column { primary, fallback }
}

/// Activities sheet columns
pub mod activity_columns {
    use super::{column, Column};

    pub const PHASE: Column = column("المرحلة", "Phase");
    pub const MAIN_ACTIVITY: Column = column("النشاط الرئيسي", "Main Activity");
    pub const SUB_ACTIVITY: Column = column("النشاط الفرعي", "Sub Activity");
    pub const STATUS: Column = column("الحالة", "Status");
    pub const PLANNED_START: Column = column("تاريخ البدء المخطط", "Start Date");
    pub const PLANNED_END: Column = column("تاريخ الانتهاء المخطط", "End Date");
}

/// Support sheet columns
pub mod support_columns {
    use super::{column, Column};

    pub const TASK: Column = column("أعمال الدعم التشغيلي", "Support Activity");
    pub const OWNER: Column = column("المسؤول من الفريق", "Team Member");
    pub const STATUS: Column = column("الحالة", "Status");
    pub const COMPLETION_DATE: Column = column("تاريخ الانتهاء", "Completion Date");
}

/// Risks sheet columns
pub mod risk_columns {
    use super::{column, Column};

    pub const DESCRIPTION: Column = column("المخاطر والتحديات", "Risk Description");
    pub const KIND: Column = column("النوع", "Type");
    pub const STATUS: Column = column("الحالة", "Status");
    pub const MITIGATION: Column = column("آليات المعالجة", "Treatment");
}

/// Column labels of a sheet's first row, index-aligned with every row below
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMap {
    labels: Vec<Option<String>>,
}

impl HeaderMap {
    pub fn from_row(row: &[Cell]) -> Self {
        let labels = row
            .iter()
            .map(|cell| Some(cell.to_text()).filter(|label| !label.is_empty()))
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.iter().all(Option::is_none)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().flatten().any(|l| l == label)
    }

    /// The cell under `label` in `row`. With duplicate labels the rightmost
    /// present cell wins. Cells beyond the end of a short row are absent.
    pub fn cell<'r>(&self, row: &'r [Cell], label: &str) -> Option<&'r Cell> {
        self.labels
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, l)| l.as_deref() == Some(label))
            .filter_map(|(idx, _)| row.get(idx))
            .find(|cell| !cell.is_missing())
    }

    /// Primary label first, fallback label second
    pub fn field(&self, row: &[Cell], column: Column) -> Option<String> {
        self.cell(row, column.primary)
            .or_else(|| self.cell(row, column.fallback))
            .map(Cell::to_text)
    }

    fn text(&self, row: &[Cell], column: Column) -> String {
        self.field(row, column).unwrap_or_default()
    }
}

/// Whether a row has no present cell at all
pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_missing)
}

pub fn normalize_activity(header: &HeaderMap, row: &[Cell]) -> ActivityRecord {
    use activity_columns::*;

    ActivityRecord {
        phase: header
            .field(row, PHASE)
            .unwrap_or_else(|| UNSPECIFIED_PHASE.to_string()),
        main_activity: header.text(row, MAIN_ACTIVITY),
        sub_activity: header.text(row, SUB_ACTIVITY),
        status: header
            .field(row, STATUS)
            .map(|token| ActivityStatus::parse_or_default(&token))
            .unwrap_or_default(),
        planned_start: header.text(row, PLANNED_START),
        planned_end: header.text(row, PLANNED_END),
    }
}

pub fn normalize_support(header: &HeaderMap, row: &[Cell]) -> SupportRecord {
    use support_columns::*;

    SupportRecord {
        task: header.text(row, TASK),
        owner: header.text(row, OWNER),
        status: header
            .field(row, STATUS)
            .unwrap_or_else(|| ActivityStatus::Completed.as_str().to_string()),
        completion_date: header.text(row, COMPLETION_DATE),
    }
}

pub fn normalize_risk(header: &HeaderMap, row: &[Cell]) -> RiskRecord {
    use risk_columns::*;

    RiskRecord {
        description: header.text(row, DESCRIPTION),
        kind: header
            .field(row, KIND)
            .map(|token| RiskType::parse_or_default(&token))
            .unwrap_or_default(),
        status: header
            .field(row, STATUS)
            .map(|token| RiskStatus::parse_or_default(&token))
            .unwrap_or_default(),
        mitigation: header.field(row, MITIGATION),
    }
}
