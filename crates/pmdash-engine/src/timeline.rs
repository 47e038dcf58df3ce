//! Timeline calculator
//!
//! Time progress is measured against a fixed project window and the current
//! date only; it never looks at row data. A timeline sheet override replaces
//! the computed summary as a whole.

use chrono::NaiveDate;
use pmdash_core::{round2, ProjectWindow, TimelineSummary};
use pmdash_parser::TimelineOverride;

/// Computes the timeline section for one conversion run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimelineCalculator {
    pub window: ProjectWindow,
}

impl TimelineCalculator {
    pub fn new(window: ProjectWindow) -> Self {
        Self { window }
    }

    /// Elapsed share of the window at `today`, clamped to 0-100.
    ///
    /// `today` counts as an elapsed day once the window has started, so the
    /// start date itself already shows progress. A window of zero or
    /// negative length yields 0.
    pub fn time_progress(&self, today: NaiveDate) -> f64 {
        let total_days = self.window.total_days();
        if total_days <= 0 {
            return 0.0;
        }
        let elapsed_days = if today >= self.window.start {
            (today - self.window.start).num_days() + 1
        } else {
            0
        };
        clamp_percentage(round2(elapsed_days as f64 / total_days as f64 * 100.0))
    }

    /// Summary computed from the window; `activity_progress` is the overview
    /// completion percentage.
    pub fn compute(&self, today: NaiveDate, activity_progress: f64) -> TimelineSummary {
        let summary = TimelineSummary {
            time_progress_percentage: self.time_progress(today),
            activity_progress_percentage: clamp_percentage(activity_progress),
            project_start: self.window.start,
            current_date: today,
        };
        tracing::debug!(
            start = %self.window.start,
            end = %self.window.end,
            today = %today,
            total_days = self.window.total_days(),
            time_progress = summary.time_progress_percentage,
            activity_progress = summary.activity_progress_percentage,
            "timeline computed"
        );
        summary
    }

    /// Computed summary, or the override as a whole when one is present.
    pub fn resolve(
        &self,
        today: NaiveDate,
        activity_progress: f64,
        timeline_override: Option<&TimelineOverride>,
    ) -> TimelineSummary {
        match timeline_override {
            Some(o) => apply_override(o, today),
            None => self.compute(today, activity_progress),
        }
    }
}

/// Build the summary from explicit values only. Missing percentages are 0,
/// missing dates are `today`.
pub fn apply_override(timeline_override: &TimelineOverride, today: NaiveDate) -> TimelineSummary {
    tracing::debug!(?timeline_override, "timeline override applied");
    TimelineSummary {
        time_progress_percentage: clamp_percentage(timeline_override.time_progress.unwrap_or(0.0)),
        activity_progress_percentage: clamp_percentage(
            timeline_override.activity_progress.unwrap_or(0.0),
        ),
        project_start: timeline_override.project_start.unwrap_or(today),
        current_date: timeline_override.current_date.unwrap_or(today),
    }
}

fn clamp_percentage(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn calculator() -> TimelineCalculator {
        TimelineCalculator::default()
    }

    #[test]
    fn before_start_is_zero() {
        assert_eq!(calculator().time_progress(date(2025, 1, 1)), 0.0);
        assert_eq!(calculator().time_progress(date(2025, 6, 29)), 0.0);
    }

    #[test]
    fn start_day_counts_as_elapsed() {
        // 1 of 364 days
        assert_eq!(calculator().time_progress(date(2025, 6, 30)), 0.27);
    }

    #[test]
    fn midway() {
        // 183 of 364 days = 50.2747...
        assert_eq!(calculator().time_progress(date(2025, 12, 29)), 50.27);
        // 101 of 364 days = 27.7472...
        assert_eq!(calculator().time_progress(date(2025, 10, 8)), 27.75);
    }

    #[test]
    fn after_end_is_clamped() {
        assert_eq!(calculator().time_progress(date(2026, 6, 28)), 100.0);
        assert_eq!(calculator().time_progress(date(2026, 6, 29)), 100.0);
        assert_eq!(calculator().time_progress(date(2030, 1, 1)), 100.0);
    }

    #[test]
    fn degenerate_window_is_zero() {
        let day = date(2025, 6, 30);
        let calc = TimelineCalculator::new(ProjectWindow::new(day, day));
        assert_eq!(calc.time_progress(date(2025, 7, 30)), 0.0);

        let calc = TimelineCalculator::new(ProjectWindow::new(date(2026, 1, 1), date(2025, 1, 1)));
        assert_eq!(calc.time_progress(date(2025, 7, 30)), 0.0);
    }

    #[test]
    fn compute_uses_window_and_activity_progress() {
        let summary = calculator().compute(date(2025, 12, 29), 66.67);
        assert_eq!(summary.time_progress_percentage, 50.27);
        assert_eq!(summary.activity_progress_percentage, 66.67);
        assert_eq!(summary.project_start, date(2025, 6, 30));
        assert_eq!(summary.current_date, date(2025, 12, 29));
    }

    #[test]
    fn override_replaces_computed_values() {
        let o = TimelineOverride {
            time_progress: Some(45.5),
            activity_progress: Some(20.0),
            project_start: Some(date(2025, 1, 1)),
            current_date: Some(date(2025, 12, 31)),
        };
        let summary = calculator().resolve(date(2026, 3, 1), 80.0, Some(&o));
        assert_eq!(summary.time_progress_percentage, 45.5);
        assert_eq!(summary.activity_progress_percentage, 20.0);
        assert_eq!(summary.project_start, date(2025, 1, 1));
        assert_eq!(summary.current_date, date(2025, 12, 31));
    }

    #[test]
    fn partial_override_does_not_merge() {
        let o = TimelineOverride {
            time_progress: Some(10.0),
            ..TimelineOverride::default()
        };
        let today = date(2026, 3, 1);
        let summary = calculator().resolve(today, 80.0, Some(&o));
        assert_eq!(summary.time_progress_percentage, 10.0);
        assert_eq!(summary.activity_progress_percentage, 0.0);
        assert_eq!(summary.project_start, today);
        assert_eq!(summary.current_date, today);
    }

    #[test]
    fn override_percentages_are_clamped() {
        let o = TimelineOverride {
            time_progress: Some(150.0),
            activity_progress: Some(-5.0),
            ..TimelineOverride::default()
        };
        let summary = apply_override(&o, date(2025, 7, 1));
        assert_eq!(summary.time_progress_percentage, 100.0);
        assert_eq!(summary.activity_progress_percentage, 0.0);
    }
}
