//! Overview, support and risk counters

use pmdash_core::{
    percentage, ActivityStatus, OverviewStats, Phase, RiskRecord, RiskStatus, RiskSummary,
    SupportRecord, SupportSummary,
};

/// Status partition of every activity across phases.
///
/// Every activity lands in exactly one of the four status counters.
pub fn overview_stats(phases: &[Phase]) -> OverviewStats {
    let mut stats = OverviewStats::default();

    for activity in phases.iter().flat_map(|p| p.activities.iter()) {
        stats.total_activities += 1;
        match activity.status {
            ActivityStatus::Completed => stats.completed_activities += 1,
            ActivityStatus::InProgress => stats.in_progress_activities += 1,
            ActivityStatus::Delayed => stats.delayed_activities += 1,
            ActivityStatus::NotStarted => stats.not_started_activities += 1,
        }
    }

    stats.completion_percentage = percentage(stats.completed_activities, stats.total_activities);
    stats
}

/// Support counters. Tokens outside the known set count towards the total only.
pub fn support_summary(activities: Vec<SupportRecord>) -> SupportSummary {
    let mut summary = SupportSummary {
        total_support: activities.len(),
        ..SupportSummary::default()
    };

    for record in &activities {
        match record.recognized_status() {
            Some(ActivityStatus::Completed) => summary.completed_support += 1,
            Some(ActivityStatus::InProgress) => summary.in_progress_support += 1,
            Some(ActivityStatus::Delayed) => summary.delayed_support += 1,
            Some(ActivityStatus::NotStarted) => summary.not_started_support += 1,
            None => {}
        }
    }

    summary.activities = activities;
    summary
}

pub fn risk_summary(risks_list: Vec<RiskRecord>) -> RiskSummary {
    let active_risks = risks_list
        .iter()
        .filter(|r| r.status == RiskStatus::Active)
        .count();

    RiskSummary {
        total_risks: risks_list.len(),
        active_risks,
        resolved_risks: risks_list.len() - active_risks,
        risks_list,
    }
}
