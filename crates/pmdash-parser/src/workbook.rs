//! Tabular reader
//!
//! Opens a workbook from bytes and yields every sheet as a grid of `Cell`s.
//! The first row of a sheet is its header; rows may be shorter than the
//! header.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Days, NaiveDate};
use pmdash_core::ConvertError;

/// A scalar cell value
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    /// Whether the cell counts as absent (empty, or empty text)
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text form of the cell. Whole numbers print without a fraction,
    /// dates as `YYYY-MM-DD`.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Numeric value, parsing text like `"45.5"` or `"45.5%"`
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Calendar date, accepting date cells, ISO text and Excel serial numbers
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date_text(s),
            Cell::Number(n) => serial_to_date(*n),
            _ => None,
        }
    }
}

/// One named sheet as read from the workbook
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// The header row, if the sheet has one with at least one label
    pub fn header_row(&self) -> Option<&[Cell]> {
        self.rows
            .first()
            .map(Vec::as_slice)
            .filter(|row| row.iter().any(|c| !c.is_missing()))
    }

    /// Rows below the header
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Parse workbook bytes (`.xlsx`, `.xls`, `.xlsb`, `.ods`) into sheets, in
/// workbook order.
///
/// Fails with `ConvertError::Format` when the bytes are not a spreadsheet
/// container. A sheet whose cells cannot be read is skipped.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<RawSheet>, ConvertError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ConvertError::Format(format!("cannot open workbook: {e}")))?;

    let names = workbook.sheet_names();
    tracing::debug!(sheets = ?names, "reading workbook");

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!("Skipping unreadable sheet '{}': {}", name, e);
                continue;
            }
        };
        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();
        tracing::debug!(sheet = %name, rows = rows.len(), "sheet read");
        sheets.push(RawSheet { name, rows });
    }

    Ok(sheets)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Cell::Date(d.date()))
            .unwrap_or_else(|| Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_date_text(s)
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part
fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Excel serial day number (1900 date system) to a calendar date.
///
/// Only used for plain number cells; formatted date cells carry their
/// workbook's date system and are converted by calamine.
/// Serial 1 is 1900-01-01; serials after 60 absorb the phantom 1900-02-29.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    let days = serial.floor() as u64;
    let (epoch, offset) = if days > 60 {
        (NaiveDate::from_ymd_opt(1899, 12, 30)?, days)
    } else {
        (NaiveDate::from_ymd_opt(1899, 12, 31)?, days)
    };
    epoch.checked_add_days(Days::new(offset))
}
