//! Read-only dashboard view
//!
//! The presentation layer reads the persisted `DashboardDocument` through
//! this view. Every accessor is a non-mutating projection; nothing here
//! recomputes the aggregates produced by the conversion run.
//!
//! # Example
//!
//! ```rust
//! use pmdash_core::{ActivityStatus, Dashboard, DashboardDocument};
//!
//! let dashboard = Dashboard::new(DashboardDocument::default());
//! assert_eq!(dashboard.overview().total_activities, 0);
//! assert!(dashboard.activities_by_status(ActivityStatus::Completed).is_empty());
//! ```

use crate::{
    ActivityRecord, ActivityStatus, DashboardDocument, OverviewStats, Phase, RiskRecord,
    RiskStatus, RiskSummary, RiskType, SupportRecord, SupportSummary, TimelineSummary,
};

/// Read accessors over one dashboard document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dashboard {
    document: DashboardDocument,
}

impl Dashboard {
    pub fn new(document: DashboardDocument) -> Self {
        Self { document }
    }

    /// The "no data available" dashboard
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &DashboardDocument {
        &self.document
    }

    pub fn into_document(self) -> DashboardDocument {
        self.document
    }

    pub fn has_data(&self) -> bool {
        !self.document.is_empty()
    }

    // ------------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------------

    pub fn overview(&self) -> &OverviewStats {
        &self.document.overview
    }

    pub fn phases(&self) -> &[Phase] {
        &self.document.phases
    }

    pub fn support(&self) -> &SupportSummary {
        &self.document.support
    }

    pub fn risks(&self) -> &RiskSummary {
        &self.document.risks
    }

    pub fn timeline(&self) -> &TimelineSummary {
        &self.document.timeline
    }

    // ------------------------------------------------------------------------
    // Derived helpers
    // ------------------------------------------------------------------------

    /// Every activity, flattened in phase order
    pub fn all_activities(&self) -> Vec<&ActivityRecord> {
        self.document.activities().collect()
    }

    pub fn activities_by_status(&self, status: ActivityStatus) -> Vec<&ActivityRecord> {
        self.document
            .activities()
            .filter(|a| a.status == status)
            .collect()
    }

    /// Activities of the phase with exactly this name (empty if unknown)
    pub fn activities_by_phase(&self, name: &str) -> &[ActivityRecord] {
        self.document
            .phases
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.activities.as_slice())
            .unwrap_or(&[])
    }

    pub fn risks_by_status(&self, status: RiskStatus) -> Vec<&RiskRecord> {
        self.document
            .risks
            .risks_list
            .iter()
            .filter(|r| r.status == status)
            .collect()
    }

    pub fn risks_by_type(&self, kind: RiskType) -> Vec<&RiskRecord> {
        self.document
            .risks
            .risks_list
            .iter()
            .filter(|r| r.kind == kind)
            .collect()
    }

    pub fn support_by_member(&self, member: &str) -> Vec<&SupportRecord> {
        self.document
            .support
            .activities
            .iter()
            .filter(|s| s.owner == member)
            .collect()
    }
}

impl From<DashboardDocument> for Dashboard {
    fn from(document: DashboardDocument) -> Self {
        Self::new(document)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn activity(phase: &str, main: &str, status: ActivityStatus) -> ActivityRecord {
        ActivityRecord {
            phase: phase.to_string(),
            main_activity: main.to_string(),
            status,
            ..ActivityRecord::default()
        }
    }

    fn risk(description: &str, kind: RiskType, status: RiskStatus) -> RiskRecord {
        RiskRecord {
            description: description.to_string(),
            kind,
            status,
            mitigation: None,
        }
    }

    fn sample() -> Dashboard {
        let mut doc = DashboardDocument::default();
        doc.phases = vec![
            Phase {
                name: "التخطيط".into(),
                total_activities: 2,
                completed_activities: 1,
                completion_percentage: 50.0,
                activities: vec![
                    activity("التخطيط", "Charter", ActivityStatus::Completed),
                    activity("التخطيط", "Plan", ActivityStatus::InProgress),
                ],
            },
            Phase {
                name: "التنفيذ".into(),
                total_activities: 1,
                completed_activities: 0,
                completion_percentage: 0.0,
                activities: vec![activity("التنفيذ", "Build", ActivityStatus::Delayed)],
            },
        ];
        doc.support.activities = vec![
            SupportRecord {
                task: "Backups".into(),
                owner: "Sara".into(),
                status: "مكتمل".into(),
                completion_date: "2025-08-01".into(),
            },
            SupportRecord {
                task: "Patching".into(),
                owner: "Omar".into(),
                status: "قيد التنفيذ".into(),
                completion_date: String::new(),
            },
        ];
        doc.risks.risks_list = vec![
            risk("Vendor delay", RiskType::Risk, RiskStatus::Active),
            risk("Staffing", RiskType::Challenge, RiskStatus::Resolved),
            risk("Scope creep", RiskType::Risk, RiskStatus::Resolved),
        ];
        Dashboard::new(doc)
    }

    #[test]
    fn all_activities_in_phase_order() {
        let dashboard = sample();
        let names: Vec<_> = dashboard
            .all_activities()
            .iter()
            .map(|a| a.main_activity.as_str())
            .collect();
        assert_eq!(names, vec!["Charter", "Plan", "Build"]);
    }

    #[test]
    fn activities_by_status() {
        let dashboard = sample();
        let delayed = dashboard.activities_by_status(ActivityStatus::Delayed);
        assert_eq!(delayed.len(), 1);
        assert_eq!(delayed[0].main_activity, "Build");
        assert!(dashboard.activities_by_status(ActivityStatus::NotStarted).is_empty());
    }

    #[test]
    fn activities_by_phase_exact_name() {
        let dashboard = sample();
        assert_eq!(dashboard.activities_by_phase("التخطيط").len(), 2);
        assert!(dashboard.activities_by_phase("التخطيط ").is_empty());
        assert!(dashboard.activities_by_phase("missing").is_empty());
    }

    #[test]
    fn risks_by_status_and_type() {
        let dashboard = sample();
        assert_eq!(dashboard.risks_by_status(RiskStatus::Active).len(), 1);
        assert_eq!(dashboard.risks_by_status(RiskStatus::Resolved).len(), 2);
        assert_eq!(dashboard.risks_by_type(RiskType::Challenge).len(), 1);
        assert_eq!(dashboard.risks_by_type(RiskType::Risk).len(), 2);
    }

    #[test]
    fn support_by_member() {
        let dashboard = sample();
        let omar = dashboard.support_by_member("Omar");
        assert_eq!(omar.len(), 1);
        assert_eq!(omar[0].task, "Patching");
        assert_eq!(omar[0].recognized_status(), Some(ActivityStatus::InProgress));
    }

    #[test]
    fn empty_dashboard_has_no_data() {
        let dashboard = Dashboard::empty();
        assert!(!dashboard.has_data());
        assert!(dashboard.phases().is_empty());
        assert_eq!(dashboard.risks().total_risks, 0);
        assert!(sample().has_data());
    }
}
