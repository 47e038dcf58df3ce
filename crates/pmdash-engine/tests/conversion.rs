//! End-to-end conversion: workbook bytes in, dashboard document out

use chrono::NaiveDate;
use pmdash_core::{ActivityStatus, ConvertError, RiskStatus};
use pmdash_engine::{from_json, Converter};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Workbook, Worksheet};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn converter() -> Converter {
    Converter::new().today(date(2025, 12, 29))
}

fn write_row(ws: &mut Worksheet, row: u32, cells: &[&str]) {
    for (col, value) in cells.iter().enumerate() {
        ws.write_string(row, col as u16, *value).unwrap();
    }
}

fn add_sheet(wb: &mut Workbook, name: &str, rows: &[&[&str]]) {
    let ws = wb.add_worksheet();
    ws.set_name(name).unwrap();
    for (idx, cells) in rows.iter().enumerate() {
        write_row(ws, idx as u32, cells);
    }
}

fn activities_header() -> &'static [&'static str] {
    &["المرحلة", "النشاط الرئيسي", "النشاط الفرعي", "الحالة", "تاريخ البدء المخطط", "تاريخ الانتهاء المخطط"]
}

fn full_workbook() -> Vec<u8> {
    let mut wb = Workbook::new();
    add_sheet(
        &mut wb,
        "أنشطة",
        &[
            activities_header(),
            &["التخطيط", "الميثاق", "", "مكتمل", "2025-07-01", "2025-07-10"],
            &["التنفيذ", "البناء", "", "قيد التنفيذ", "2025-08-01", "2025-10-01"],
            &["التخطيط", "الخطة", "", "مكتمل", "2025-07-11", "2025-07-20"],
            &["التنفيذ", "الاختبار", "", "متأخر", "2025-10-01", "2025-11-01"],
            &["الإغلاق", "التسليم", "", "", "2026-05-01", "2026-06-29"],
        ],
    );
    add_sheet(
        &mut wb,
        "الدعم",
        &[
            &["أعمال الدعم التشغيلي", "المسؤول من الفريق", "الحالة", "تاريخ الانتهاء"],
            &["النسخ الاحتياطي", "سارة", "مكتمل", "2025-08-01"],
            &["التحديثات", "عمر", "قيد التنفيذ", ""],
        ],
    );
    add_sheet(
        &mut wb,
        "Risks",
        &[
            &["Risk Description", "Type", "Status", "Treatment"],
            &["Vendor delay", "خطر", "قائم", "Second supplier"],
            &["Staffing", "تحدي", "منتهي", ""],
        ],
    );
    add_sheet(&mut wb, "Notes", &[&["Free text"], &["ignored"]]);
    wb.save_to_buffer().unwrap()
}

#[test]
fn converts_full_workbook() {
    let doc = converter().convert(&full_workbook()).unwrap();

    let names: Vec<_> = doc.phases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["التخطيط", "التنفيذ", "الإغلاق"]);
    assert_eq!(doc.phases[0].completion_percentage, 100.0);
    assert_eq!(doc.phases[1].completion_percentage, 0.0);
    assert_eq!(doc.phases[2].activities[0].status, ActivityStatus::NotStarted);

    assert_eq!(doc.overview.total_activities, 5);
    assert_eq!(doc.overview.completed_activities, 2);
    assert_eq!(doc.overview.in_progress_activities, 1);
    assert_eq!(doc.overview.delayed_activities, 1);
    assert_eq!(doc.overview.not_started_activities, 1);
    assert_eq!(doc.overview.completion_percentage, 40.0);

    assert_eq!(doc.support.total_support, 2);
    assert_eq!(doc.support.completed_support, 1);
    assert_eq!(doc.support.in_progress_support, 1);

    assert_eq!(doc.risks.total_risks, 2);
    assert_eq!(doc.risks.active_risks, 1);
    assert_eq!(doc.risks.resolved_risks, 1);
    assert_eq!(doc.risks.risks_list[0].mitigation.as_deref(), Some("Second supplier"));
    assert_eq!(doc.risks.risks_list[1].mitigation, None);

    assert_eq!(doc.timeline.time_progress_percentage, 50.27);
    assert_eq!(doc.timeline.activity_progress_percentage, 40.0);
    assert_eq!(doc.timeline.project_start, date(2025, 6, 30));
    assert_eq!(doc.timeline.current_date, date(2025, 12, 29));
}

#[test]
fn three_rows_one_phase() {
    let mut wb = Workbook::new();
    add_sheet(
        &mut wb,
        "Activities",
        &[
            &["Phase", "Main Activity", "Status"],
            &["P1", "a", "Completed"],
            &["P1", "b", "Completed"],
            &["P1", "c", "In Progress"],
        ],
    );
    let doc = converter().convert(&wb.save_to_buffer().unwrap()).unwrap();

    assert_eq!(doc.phases.len(), 1);
    assert_eq!(doc.phases[0].total_activities, 3);
    assert_eq!(doc.phases[0].completed_activities, 2);
    assert_eq!(doc.phases[0].completion_percentage, 66.67);
}

#[test]
fn header_only_activities_sheet() {
    let mut wb = Workbook::new();
    add_sheet(&mut wb, "Activities", &[activities_header()]);
    let doc = converter().convert(&wb.save_to_buffer().unwrap()).unwrap();

    assert!(doc.phases.is_empty());
    assert_eq!(doc.overview.completion_percentage, 0.0);
    assert_eq!(doc.timeline.activity_progress_percentage, 0.0);
}

#[test]
fn active_risk_without_mitigation_column() {
    let mut wb = Workbook::new();
    add_sheet(
        &mut wb,
        "المخاطر",
        &[&["المخاطر والتحديات", "النوع", "الحالة"], &["تأخر المورد", "خطر", "قائم"]],
    );
    let doc = converter().convert(&wb.save_to_buffer().unwrap()).unwrap();

    assert_eq!(doc.risks.risks_list[0].mitigation, None);
    assert_eq!(doc.risks.risks_list[0].status, RiskStatus::Active);
    assert_eq!(doc.risks.active_risks, 1);
}

#[test]
fn unrecognized_sheet_is_ignored() {
    let doc = converter().convert(&full_workbook()).unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    assert!(!json.contains("Free text"));
    assert!(!json.contains("ignored"));
}

#[test]
fn timeline_override_wins() {
    let mut wb = Workbook::new();
    add_sheet(&mut wb, "Activities", &[&["Phase", "Status"], &["P1", "مكتمل"]]);
    let ws = wb.add_worksheet();
    ws.set_name("Timeline").unwrap();
    write_row(ws, 0, &["time", "activity", "start", "current"]);
    ws.write_number(1, 0, 45.5).unwrap();
    ws.write_number(1, 1, 20.0).unwrap();
    ws.write_string(1, 2, "2025-01-01").unwrap();
    ws.write_string(1, 3, "2025-12-31").unwrap();

    let doc = converter().convert(&wb.save_to_buffer().unwrap()).unwrap();
    assert_eq!(doc.timeline.time_progress_percentage, 45.5);
    assert_eq!(doc.timeline.activity_progress_percentage, 20.0);
    assert_eq!(doc.timeline.project_start, date(2025, 1, 1));
    assert_eq!(doc.timeline.current_date, date(2025, 12, 31));
    assert_eq!(doc.overview.completion_percentage, 100.0);
}

#[test]
fn same_input_same_date_same_bytes() {
    let bytes = full_workbook();
    let first = converter().convert_to_json(&bytes, true).unwrap();
    let second = converter().convert_to_json(&bytes, true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn json_round_trip() {
    let bytes = full_workbook();
    let doc = converter().convert(&bytes).unwrap();
    let json = converter().convert_to_json(&bytes, false).unwrap();
    assert_eq!(from_json(&json).unwrap(), doc);
}

#[test]
fn unparseable_document_produces_nothing() {
    let err = converter().convert_to_json(b"<html>not a workbook</html>", true).unwrap_err();
    assert!(matches!(err, ConvertError::Format(_)));
}
