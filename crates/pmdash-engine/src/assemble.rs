//! Output assembler
//!
//! Merges the aggregates into one `DashboardDocument` and encodes it as JSON.

use chrono::NaiveDate;
use pmdash_core::{ConvertError, DashboardDocument};
use pmdash_parser::WorkbookContents;

use crate::overview::{overview_stats, risk_summary, support_summary};
use crate::phases::aggregate_phases;
use crate::timeline::TimelineCalculator;

/// Aggregate extracted records into the document.
pub fn assemble(
    contents: WorkbookContents,
    calculator: &TimelineCalculator,
    today: NaiveDate,
) -> DashboardDocument {
    let phases = aggregate_phases(&contents.activities);
    let overview = overview_stats(&phases);
    let timeline = calculator.resolve(today, overview.completion_percentage, contents.timeline.as_ref());

    DashboardDocument {
        overview,
        phases,
        support: support_summary(contents.support),
        risks: risk_summary(contents.risks),
        timeline,
    }
}

/// Every number in the document must be finite before it is encoded;
/// JSON has no representation for NaN or infinity.
pub fn ensure_finite(document: &DashboardDocument) -> Result<(), ConvertError> {
    let mut fields: Vec<(String, f64)> = vec![
        (
            "overview.completion_percentage".into(),
            document.overview.completion_percentage,
        ),
        (
            "timeline.time_progress_percentage".into(),
            document.timeline.time_progress_percentage,
        ),
        (
            "timeline.activity_progress_percentage".into(),
            document.timeline.activity_progress_percentage,
        ),
    ];
    fields.extend(document.phases.iter().map(|p| {
        (
            format!("phases[{}].completion_percentage", p.name),
            p.completion_percentage,
        )
    }));

    match fields.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(ConvertError::Serialization(format!(
            "{field} is not a finite number ({value})"
        ))),
        None => Ok(()),
    }
}

/// Encode the document. `pretty` uses two-space indentation.
pub fn to_json(document: &DashboardDocument, pretty: bool) -> Result<String, ConvertError> {
    ensure_finite(document)?;
    let encoded = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    encoded.map_err(|e| ConvertError::Serialization(e.to_string()))
}

/// Decode a document previously produced by [`to_json`].
pub fn from_json(input: &str) -> Result<DashboardDocument, ConvertError> {
    serde_json::from_str(input).map_err(|e| ConvertError::Serialization(e.to_string()))
}
