//! Phase aggregator
//!
//! Groups activities by their exact phase label. Phases appear in order of
//! first appearance; labels are compared verbatim, so `"Design"` and
//! `"Design "` are two phases.

use std::collections::HashMap;

use pmdash_core::{percentage, ActivityRecord, ActivityStatus, Phase};

/// Group activities into phases, preserving first-seen order.
pub fn aggregate_phases(activities: &[ActivityRecord]) -> Vec<Phase> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<ActivityRecord>)> = Vec::new();

    for activity in activities {
        let slot = *index.entry(activity.phase.as_str()).or_insert_with(|| {
            groups.push((activity.phase.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(activity.clone());
    }

    groups
        .into_iter()
        .map(|(name, activities)| build_phase(name.to_string(), activities))
        .collect()
}

/// Totals and completion percentage of one phase
pub fn build_phase(name: String, activities: Vec<ActivityRecord>) -> Phase {
    let total_activities = activities.len();
    let completed_activities = activities
        .iter()
        .filter(|a| a.status == ActivityStatus::Completed)
        .count();

    Phase {
        name,
        total_activities,
        completed_activities,
        completion_percentage: percentage(completed_activities, total_activities),
        activities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn activity(phase: &str, status: ActivityStatus) -> ActivityRecord {
        ActivityRecord {
            phase: phase.to_string(),
            status,
            ..ActivityRecord::default()
        }
    }

    #[test]
    fn two_of_three_completed() {
        let phases = aggregate_phases(&[
            activity("P1", ActivityStatus::Completed),
            activity("P1", ActivityStatus::Completed),
            activity("P1", ActivityStatus::InProgress),
        ]);

        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].name, "P1");
        assert_eq!(phases[0].total_activities, 3);
        assert_eq!(phases[0].completed_activities, 2);
        assert_eq!(phases[0].completion_percentage, 66.67);
    }

    #[test]
    fn first_appearance_order() {
        let phases = aggregate_phases(&[
            activity("C", ActivityStatus::NotStarted),
            activity("A", ActivityStatus::Completed),
            activity("C", ActivityStatus::Completed),
            activity("B", ActivityStatus::Delayed),
            activity("A", ActivityStatus::Completed),
        ]);

        let names: Vec<_> = phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(phases[0].total_activities, 2);
        assert_eq!(phases[1].completion_percentage, 100.0);
        assert_eq!(phases[2].completion_percentage, 0.0);
    }

    #[test]
    fn activities_keep_row_order_within_phase() {
        let mut first = activity("P", ActivityStatus::Completed);
        first.main_activity = "first".into();
        let mut second = activity("P", ActivityStatus::Completed);
        second.main_activity = "second".into();

        let phases = aggregate_phases(&[first.clone(), activity("Q", ActivityStatus::Delayed), second.clone()]);
        assert_eq!(phases[0].activities, vec![first, second]);
    }

    #[test]
    fn whitespace_variants_are_distinct_phases() {
        let phases = aggregate_phases(&[
            activity("Design", ActivityStatus::Completed),
            activity("Design ", ActivityStatus::Completed),
        ]);
        assert_eq!(phases.len(), 2);
    }

    #[test]
    fn no_activities_no_phases() {
        assert!(aggregate_phases(&[]).is_empty());
    }

    #[test]
    fn empty_phase_has_zero_percentage() {
        let phase = build_phase("Empty".into(), Vec::new());
        assert_eq!(phase.total_activities, 0);
        assert_eq!(phase.completion_percentage, 0.0);
    }

    #[test]
    fn completed_never_exceeds_total() {
        let statuses = ActivityStatus::ALL;
        let activities: Vec<_> = (0..20)
            .map(|i| activity(&format!("P{}", i % 3), statuses[i % statuses.len()]))
            .collect();

        for phase in aggregate_phases(&activities) {
            assert!(phase.completed_activities <= phase.total_activities);
            assert!((0.0..=100.0).contains(&phase.completion_percentage));
        }
    }
}
