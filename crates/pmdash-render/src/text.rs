//! Plain-text dashboard summary
//!
//! ## Example Output
//!
//! ```text
//! Project Dashboard
//! =================
//!
//! Overview
//!   Total activities:         5
//!   Completed:                2
//!   In Progress:              1
//!   Delayed:                  1
//!   Not Started:              1
//!   Completion:          40.00%
//!
//! Timeline
//!   Project start:       2025-06-30
//!   Current date:        2025-12-29
//!   Time progress:       50.27%
//!   Activity progress:   40.00%
//! ```

use pmdash_core::{
    DashboardDocument, OverviewStats, Phase, RenderError, Renderer, RiskSummary,
    SupportSummary, TimelineSummary,
};

use crate::{selected, Section};

/// Text summary renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Document title printed above the sections
    pub title: String,
    /// Sections to print; empty means all
    pub sections: Vec<Section>,
    /// List individual activities, support tasks and risks
    pub show_details: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            title: "Project Dashboard".into(),
            sections: Vec::new(),
            show_details: false,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Limit output to `section`; may be called repeatedly
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn details(mut self) -> Self {
        self.show_details = true;
        self
    }

    fn overview(&self, out: &mut String, stats: &OverviewStats) {
        out.push_str(&format!("  Total activities:  {:>8}\n", stats.total_activities));
        out.push_str(&format!("  Completed:         {:>8}\n", stats.completed_activities));
        out.push_str(&format!("  In Progress:       {:>8}\n", stats.in_progress_activities));
        out.push_str(&format!("  Delayed:           {:>8}\n", stats.delayed_activities));
        out.push_str(&format!("  Not Started:       {:>8}\n", stats.not_started_activities));
        out.push_str(&format!(
            "  Completion:        {:>7.2}%\n",
            stats.completion_percentage
        ));
    }

    fn phases(&self, out: &mut String, phases: &[Phase]) {
        if phases.is_empty() {
            out.push_str("  (none)\n");
            return;
        }
        for phase in phases {
            out.push_str(&format!(
                "  {}  {}/{}  {:.2}%\n",
                phase.name,
                phase.completed_activities,
                phase.total_activities,
                phase.completion_percentage
            ));
            if self.show_details {
                for activity in &phase.activities {
                    let name = if activity.sub_activity.is_empty() {
                        activity.main_activity.clone()
                    } else {
                        format!("{} / {}", activity.main_activity, activity.sub_activity)
                    };
                    out.push_str(&format!("    - [{}] {}\n", activity.status, name));
                }
            }
        }
    }

    fn support(&self, out: &mut String, support: &SupportSummary) {
        out.push_str(&format!("  Total tasks:       {:>8}\n", support.total_support));
        out.push_str(&format!("  Completed:         {:>8}\n", support.completed_support));
        out.push_str(&format!("  In Progress:       {:>8}\n", support.in_progress_support));
        out.push_str(&format!("  Delayed:           {:>8}\n", support.delayed_support));
        out.push_str(&format!("  Not Started:       {:>8}\n", support.not_started_support));
        if self.show_details {
            for task in &support.activities {
                out.push_str(&format!("    - [{}] {} ({})\n", task.status, task.task, task.owner));
            }
        }
    }

    fn risks(&self, out: &mut String, risks: &RiskSummary) {
        out.push_str(&format!("  Total:             {:>8}\n", risks.total_risks));
        out.push_str(&format!("  Active:            {:>8}\n", risks.active_risks));
        out.push_str(&format!("  Resolved:          {:>8}\n", risks.resolved_risks));
        if self.show_details {
            for risk in &risks.risks_list {
                out.push_str(&format!("    - [{}] {} ({})\n", risk.status, risk.description, risk.kind));
                if let Some(mitigation) = &risk.mitigation {
                    out.push_str(&format!("      -> {}\n", mitigation));
                }
            }
        }
    }

    fn timeline(&self, out: &mut String, timeline: &TimelineSummary) {
        out.push_str(&format!("  Project start:       {}\n", timeline.project_start));
        out.push_str(&format!("  Current date:        {}\n", timeline.current_date));
        out.push_str(&format!(
            "  Time progress:       {:.2}%\n",
            timeline.time_progress_percentage
        ));
        out.push_str(&format!(
            "  Activity progress:   {:.2}%\n",
            timeline.activity_progress_percentage
        ));
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, document: &DashboardDocument) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str(&format!("{}\n{}\n", self.title, "=".repeat(self.title.chars().count())));

        for section in selected(&self.sections) {
            out.push_str(&format!("\n{}\n", section.title()));
            match section {
                Section::Overview => self.overview(&mut out, &document.overview),
                Section::Phases => self.phases(&mut out, &document.phases),
                Section::Support => self.support(&mut out, &document.support),
                Section::Risks => self.risks(&mut out, &document.risks),
                Section::Timeline => self.timeline(&mut out, &document.timeline),
            }
        }
        Ok(out)
    }
}
