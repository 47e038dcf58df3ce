//! # pmdash-core
//!
//! Core domain model and traits for the pmdash dashboard pipeline.
//!
//! This crate provides:
//! - Status enumerations: `ActivityStatus`, `RiskStatus`, `RiskType`
//! - Record types: `ActivityRecord`, `SupportRecord`, `RiskRecord`
//! - Aggregates: `Phase`, `OverviewStats`, `SupportSummary`, `RiskSummary`,
//!   `TimelineSummary` and the root `DashboardDocument`
//! - The read-only presentation view (`Dashboard`)
//! - Error types and the `Renderer` trait
//!
//! ## Example
//!
//! ```rust
//! use pmdash_core::{percentage, ActivityStatus};
//!
//! assert_eq!(ActivityStatus::recognize("مكتمل"), Some(ActivityStatus::Completed));
//! assert_eq!(ActivityStatus::parse_or_default("???"), ActivityStatus::NotStarted);
//! assert_eq!(percentage(2, 3), 66.67);
//! assert_eq!(percentage(0, 0), 0.0);
//! ```

pub mod dashboard;

pub use dashboard::Dashboard;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Percentages
// ============================================================================

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total * 100`, rounded to two decimals.
///
/// Returns `0.0` when `total == 0`; no percentage in the document is ever NaN.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

// ============================================================================
// Status Enumerations
// ============================================================================

/// Status of a project or support activity.
///
/// Serialized as the Arabic token the dashboard displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[serde(rename = "مكتمل", alias = "completed")]
    Completed,
    #[serde(rename = "قيد التنفيذ", alias = "in_progress")]
    InProgress,
    #[serde(rename = "متأخر", alias = "delayed")]
    Delayed,
    #[serde(rename = "لم يبدأ", alias = "not_started")]
    #[default]
    NotStarted,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::Completed,
        ActivityStatus::InProgress,
        ActivityStatus::Delayed,
        ActivityStatus::NotStarted,
    ];

    /// The Arabic token used in workbooks and in the output document
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Completed => "مكتمل",
            ActivityStatus::InProgress => "قيد التنفيذ",
            ActivityStatus::Delayed => "متأخر",
            ActivityStatus::NotStarted => "لم يبدأ",
        }
    }

    /// English display label
    pub fn label(&self) -> &'static str {
        match self {
            ActivityStatus::Completed => "Completed",
            ActivityStatus::InProgress => "In Progress",
            ActivityStatus::Delayed => "Delayed",
            ActivityStatus::NotStarted => "Not Started",
        }
    }

    /// Recognize a status token (Arabic or English, surrounding whitespace ignored).
    pub fn recognize(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(status) = Self::ALL.into_iter().find(|s| s.as_str() == token) {
            return Some(status);
        }
        match normalize_ascii_token(token).as_str() {
            "completed" | "complete" | "done" => Some(ActivityStatus::Completed),
            "in_progress" | "inprogress" => Some(ActivityStatus::InProgress),
            "delayed" | "late" => Some(ActivityStatus::Delayed),
            "not_started" | "notstarted" => Some(ActivityStatus::NotStarted),
            _ => None,
        }
    }

    /// Recognize a status token, falling back to `NotStarted`.
    pub fn parse_or_default(token: &str) -> Self {
        Self::recognize(token).unwrap_or_default()
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a risk is still open
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    #[serde(rename = "قائم", alias = "active")]
    Active,
    #[serde(rename = "منتهي", alias = "resolved")]
    #[default]
    Resolved,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Active => "قائم",
            RiskStatus::Resolved => "منتهي",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskStatus::Active => "Active",
            RiskStatus::Resolved => "Resolved",
        }
    }

    pub fn recognize(token: &str) -> Option<Self> {
        let token = token.trim();
        match token {
            "قائم" => return Some(RiskStatus::Active),
            "منتهي" => return Some(RiskStatus::Resolved),
            _ => {}
        }
        match normalize_ascii_token(token).as_str() {
            "active" | "open" => Some(RiskStatus::Active),
            "resolved" | "closed" => Some(RiskStatus::Resolved),
            _ => None,
        }
    }

    /// Recognize a status token, falling back to `Resolved`.
    pub fn parse_or_default(token: &str) -> Self {
        Self::recognize(token).unwrap_or_default()
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk or challenge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskType {
    #[serde(rename = "خطر", alias = "risk")]
    #[default]
    Risk,
    #[serde(rename = "تحدي", alias = "challenge")]
    Challenge,
}

impl RiskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::Risk => "خطر",
            RiskType::Challenge => "تحدي",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskType::Risk => "Risk",
            RiskType::Challenge => "Challenge",
        }
    }

    pub fn recognize(token: &str) -> Option<Self> {
        let token = token.trim();
        match token {
            "خطر" => return Some(RiskType::Risk),
            "تحدي" => return Some(RiskType::Challenge),
            _ => {}
        }
        match normalize_ascii_token(token).as_str() {
            "risk" => Some(RiskType::Risk),
            "challenge" => Some(RiskType::Challenge),
            _ => None,
        }
    }

    /// Recognize a type token, falling back to `Risk`.
    pub fn parse_or_default(token: &str) -> Self {
        Self::recognize(token).unwrap_or_default()
    }
}

impl std::fmt::Display for RiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowercase ASCII with spaces and dashes folded to underscores
/// ("In Progress" -> "in_progress").
fn normalize_ascii_token(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

// ============================================================================
// Records
// ============================================================================

/// One row of the activities sheet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(rename = "المرحلة")]
    pub phase: String,
    #[serde(rename = "النشاط الرئيسي")]
    pub main_activity: String,
    #[serde(rename = "النشاط الفرعي")]
    pub sub_activity: String,
    #[serde(rename = "الحالة")]
    pub status: ActivityStatus,
    #[serde(rename = "تاريخ البدء المخطط")]
    pub planned_start: String,
    #[serde(rename = "تاريخ الانتهاء المخطط")]
    pub planned_end: String,
}

/// One row of the operational support sheet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportRecord {
    #[serde(rename = "أعمال الدعم التشغيلي")]
    pub task: String,
    #[serde(rename = "المسؤول من الفريق")]
    pub owner: String,
    /// Raw status token as written in the workbook
    #[serde(rename = "الحالة")]
    pub status: String,
    #[serde(rename = "تاريخ الانتهاء")]
    pub completion_date: String,
}

impl SupportRecord {
    /// The recognized status, if the raw token is one of the known tokens
    pub fn recognized_status(&self) -> Option<ActivityStatus> {
        ActivityStatus::recognize(&self.status)
    }
}

/// One row of the risks sheet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    #[serde(rename = "المخاطر والتحديات")]
    pub description: String,
    #[serde(rename = "النوع")]
    pub kind: RiskType,
    #[serde(rename = "الحالة")]
    pub status: RiskStatus,
    #[serde(rename = "آليات المعالجة")]
    pub mitigation: Option<String>,
}

// ============================================================================
// Aggregates
// ============================================================================

/// Activities sharing one phase label
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub total_activities: usize,
    pub completed_activities: usize,
    pub completion_percentage: f64,
    pub activities: Vec<ActivityRecord>,
}

/// Global activity counters
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_activities: usize,
    pub completed_activities: usize,
    pub in_progress_activities: usize,
    pub delayed_activities: usize,
    pub not_started_activities: usize,
    pub completion_percentage: f64,
}

/// Operational support section
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportSummary {
    pub total_support: usize,
    pub completed_support: usize,
    pub in_progress_support: usize,
    pub delayed_support: usize,
    pub not_started_support: usize,
    pub activities: Vec<SupportRecord>,
}

/// Risks and challenges section
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_risks: usize,
    pub active_risks: usize,
    pub resolved_risks: usize,
    pub risks_list: Vec<RiskRecord>,
}

/// Elapsed time against the project window, next to activity progress
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSummary {
    /// Elapsed share of the project window (0-100)
    pub time_progress_percentage: f64,
    /// Share of completed activities (0-100)
    pub activity_progress_percentage: f64,
    pub project_start: NaiveDate,
    pub current_date: NaiveDate,
}

/// The persisted dashboard document.
///
/// Produced wholesale by one conversion run; never partially updated.
/// `DashboardDocument::default()` has every counter at zero and no records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardDocument {
    pub overview: OverviewStats,
    pub phases: Vec<Phase>,
    pub support: SupportSummary,
    pub risks: RiskSummary,
    pub timeline: TimelineSummary,
}

impl DashboardDocument {
    /// All activities across phases, in phase order
    pub fn activities(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.phases.iter().flat_map(|p| p.activities.iter())
    }

    /// Whether the document carries no records at all
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
            && self.support.activities.is_empty()
            && self.risks.risks_list.is_empty()
    }
}

// ============================================================================
// Project Window
// ============================================================================

/// Fixed calendar window the time progress is measured against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ProjectWindow {
    pub const DEFAULT_START: NaiveDate = match NaiveDate::from_ymd_opt(2025, 6, 30) {
        Some(date) => date,
        None => panic!("invalid default project start"),
    };

    pub const DEFAULT_END: NaiveDate = match NaiveDate::from_ymd_opt(2026, 6, 29) {
        Some(date) => date,
        None => panic!("invalid default project end"),
    };

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Calendar days from start to end
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl Default for ProjectWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_START, Self::DEFAULT_END)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output renderer for a dashboard document
pub trait Renderer {
    type Output;

    fn render(&self, document: &DashboardDocument) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Conversion pipeline error
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input could not be parsed as a spreadsheet container
    #[error("Format error: {0}")]
    Format(String),

    /// A required structural element is missing (no usable sheet)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The document could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage collaborator error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("IO error on '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid object name: {0:?}")]
    InvalidName(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
