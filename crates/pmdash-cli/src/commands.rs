//! Subcommand implementations

use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use pmdash_core::{ActivityRecord, ActivityStatus, Dashboard, Renderer, RiskStatus, RiskType};
use pmdash_engine::to_json;
use pmdash_render::{JsonRenderer, Section, TextRenderer};
use serde::Serialize;

use crate::config::Config;

const NO_DATA: &str = "no data available";

pub fn convert(
    config: &Config,
    today: Option<NaiveDate>,
    workbook: &Path,
    output: Option<&Path>,
    pretty: bool,
) -> Result<ExitCode> {
    let bytes = std::fs::read(workbook)
        .with_context(|| format!("Failed to read {}", workbook.display()))?;
    let document = config
        .converter(today)
        .convert(&bytes)
        .with_context(|| format!("Failed to convert {}", workbook.display()))?;
    let json = to_json(&document, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {}: {} activities in {} phases, {:.2}% complete",
                path.display(),
                document.overview.total_activities,
                document.phases.len(),
                document.overview.completion_percentage
            );
        }
        None => println!("{json}"),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn upload(config: &Config, today: Option<NaiveDate>, workbook: &Path) -> Result<ExitCode> {
    let file_name = workbook
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", workbook.display()))?;
    let bytes = std::fs::read(workbook)
        .with_context(|| format!("Failed to read {}", workbook.display()))?;

    let report = config
        .service(today)
        .upload(&file_name, &bytes)
        .with_context(|| format!("Failed to upload {}", file_name))?;

    println!("Uploaded {} ({} bytes)", report.file_name, report.file_size);
    println!(
        "  Activities:  {} ({} completed, {:.2}%)",
        report.total_activities, report.completed_activities, report.completion_percentage
    );
    println!("  Phases:      {}", report.total_phases);
    println!("  Support:     {}", report.total_support);
    println!("  Risks:       {}", report.total_risks);
    Ok(ExitCode::SUCCESS)
}

pub fn refresh(config: &Config, today: Option<NaiveDate>) -> Result<ExitCode> {
    let document = config
        .service(today)
        .refresh()
        .context("Failed to refresh the dashboard")?;
    let text = TextRenderer::new().section(Section::Overview).render(&document)?;
    print!("{text}");
    Ok(ExitCode::SUCCESS)
}

/// The current dashboard, or `None` after reporting that there is no data
fn load(config: &Config, today: Option<NaiveDate>) -> Option<Dashboard> {
    match config.service(today).load() {
        Some(fetched) => {
            tracing::info!(source = %fetched.source, "dashboard loaded");
            Some(Dashboard::new(fetched.document))
        }
        None => {
            eprintln!("{NO_DATA}");
            None
        }
    }
}

pub fn show(
    config: &Config,
    today: Option<NaiveDate>,
    section: Option<Section>,
    json: bool,
    details: bool,
) -> Result<ExitCode> {
    let Some(dashboard) = load(config, today) else {
        return Ok(ExitCode::FAILURE);
    };
    let document = dashboard.document();

    let output = if json {
        let mut renderer = JsonRenderer::new().pretty();
        if let Some(section) = section {
            renderer = renderer.section(section);
        }
        let mut output = renderer.render(document)?;
        output.push('\n');
        output
    } else {
        let mut renderer = TextRenderer::new();
        if let Some(section) = section {
            renderer = renderer.section(section);
        }
        if details {
            renderer = renderer.details();
        }
        renderer.render(document)?
    };
    print!("{output}");
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(records: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

fn parse_status<T>(token: Option<&str>, recognize: fn(&str) -> Option<T>, what: &str) -> Result<Option<T>> {
    token
        .map(|t| recognize(t).ok_or_else(|| anyhow!("Unknown {what} '{t}'")))
        .transpose()
}

pub fn query_activities(
    config: &Config,
    today: Option<NaiveDate>,
    status: Option<&str>,
    phase: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let status = parse_status(status, ActivityStatus::recognize, "activity status")?;
    let Some(dashboard) = load(config, today) else {
        return Ok(ExitCode::FAILURE);
    };

    let mut records: Vec<&ActivityRecord> = match phase {
        Some(phase) => dashboard.activities_by_phase(phase).iter().collect(),
        None => dashboard.all_activities(),
    };
    if let Some(status) = status {
        records.retain(|a| a.status == status);
    }

    if json {
        print_json(&records)?;
    } else {
        for activity in records {
            let mut line = format!("[{}] {}: {}", activity.status, activity.phase, activity.main_activity);
            if !activity.sub_activity.is_empty() {
                line.push_str(&format!(" / {}", activity.sub_activity));
            }
            println!("{line}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn query_risks(
    config: &Config,
    today: Option<NaiveDate>,
    status: Option<&str>,
    kind: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let status = parse_status(status, RiskStatus::recognize, "risk status")?;
    let kind = parse_status(kind, RiskType::recognize, "risk type")?;
    let Some(dashboard) = load(config, today) else {
        return Ok(ExitCode::FAILURE);
    };

    let mut records = match status {
        Some(status) => dashboard.risks_by_status(status),
        None => dashboard.risks().risks_list.iter().collect(),
    };
    if let Some(kind) = kind {
        records.retain(|r| r.kind == kind);
    }

    if json {
        print_json(&records)?;
    } else {
        for risk in records {
            match &risk.mitigation {
                Some(mitigation) => println!("[{}] {} ({}) -> {}", risk.status, risk.description, risk.kind, mitigation),
                None => println!("[{}] {} ({})", risk.status, risk.description, risk.kind),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn query_support(
    config: &Config,
    today: Option<NaiveDate>,
    member: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let Some(dashboard) = load(config, today) else {
        return Ok(ExitCode::FAILURE);
    };

    let records = match member {
        Some(member) => dashboard.support_by_member(member),
        None => dashboard.support().activities.iter().collect(),
    };

    if json {
        print_json(&records)?;
    } else {
        for task in records {
            if task.completion_date.is_empty() {
                println!("[{}] {} ({})", task.status, task.task, task.owner);
            } else {
                println!("[{}] {} ({}) {}", task.status, task.task, task.owner, task.completion_date);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
