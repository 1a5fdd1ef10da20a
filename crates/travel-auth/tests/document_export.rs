//! Document export scenarios: reports fetched back from the report service, CSV imports and
//! the rendered two-up form.

mod support;

use std::io::Cursor;
use std::sync::Arc;

use support::{admin, filed_on, leg, submitter, RecordingGateway};
use travel_auth::workflows::travel::approvals::{
    ApprovalRequest, ApprovalWorkflow, WorkflowSettings,
};
use travel_auth::workflows::travel::document::layout::{
    HOURS_VALUE_COLUMNS, PURPOSE_REGION, TABLE_FIRST_ROW, TABLE_ROWS, TOTAL_HOURS_ROW,
};
use travel_auth::workflows::travel::document::{DocumentLayoutEngine, TravelDocumentContent};
use travel_auth::workflows::travel::{
    entries_from_reader, ExportError, FileReference, OriginChannel, Role, TravelDocumentExporter,
    TravelLogDraft,
};

#[test]
fn fetched_log_renders_every_purpose_line() {
    let entries: Vec<_> = (1..=11)
        .map(|n| leg("08:00", "10:00", &format!("Stop {n}")))
        .collect();
    let gateway = Arc::new(RecordingGateway::default());
    let workflow = ApprovalWorkflow::new(gateway, WorkflowSettings::default());
    let id = workflow
        .submit_travel_log(&submitter(Role::Employee), entries, filed_on())
        .expect("filed");

    let report = workflow
        .report(&id, OriginChannel::Employee)
        .expect("fetched back");
    let log = report.travel_log().expect("travel log body");
    let content = TravelDocumentContent {
        submitter_name: report.submitter_name.clone(),
        submitter_position: report.submitter_position.clone(),
        filed_on: report.date_submitted,
        entries: log.entries.clone(),
        team_activity: log.team_activity.clone(),
        google_maps_hours: None,
        total_hours: None,
    };
    let grid = DocumentLayoutEngine::default().render(&content, false);

    let purpose = grid
        .text(PURPOSE_REGION.first_row, PURPOSE_REGION.first_col)
        .expect("purpose text");
    let lines: Vec<&str> = purpose.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines
        .iter()
        .enumerate()
        .all(|(index, line)| line.starts_with(&format!("{}. ", index + 1))));

    let past_table = TABLE_FIRST_ROW + TABLE_ROWS as u32;
    assert!(grid.text(past_table - 1, 0).is_some());
    assert!(grid.text(past_table, 0).is_none());
}

#[test]
fn approved_report_exports_with_confirmed_total() {
    let gateway = Arc::new(RecordingGateway::default());
    let workflow = ApprovalWorkflow::new(gateway, WorkflowSettings::default());
    let id = workflow
        .submit_travel_log(
            &submitter(Role::Employee),
            vec![leg("22:00", "02:00", "Overnight haul")],
            filed_on(),
        )
        .expect("filed");
    let outcome = workflow
        .approve(
            &admin(),
            ApprovalRequest {
                report_id: id.clone(),
                origin_channel: OriginChannel::Employee,
                google_maps_hours: Some(3.5),
                total_hours: Some(6),
            },
        )
        .expect("approved");
    let report = outcome.report().expect("listed");

    let exporter = TravelDocumentExporter::default();
    let artifact = exporter.export_report(report).expect("exported");
    assert_eq!(artifact.file_name, format!("Lea_Santos_{id}.xlsx"));
    assert_eq!(&artifact.bytes[..2], b"PK");

    let log = report.travel_log().expect("travel log");
    let grid = DocumentLayoutEngine::default().render(
        &TravelDocumentContent {
            submitter_name: report.submitter_name.clone(),
            submitter_position: report.submitter_position.clone(),
            filed_on: report.date_submitted,
            entries: log.entries.clone(),
            team_activity: Vec::new(),
            google_maps_hours: report.approval.google_maps_hours,
            total_hours: report.approval.total_hours,
        },
        false,
    );
    assert_eq!(grid.text(TOTAL_HOURS_ROW, HOURS_VALUE_COLUMNS.0), Some("6"));
}

#[test]
fn attachments_have_no_printable_form() {
    let gateway = Arc::new(RecordingGateway::default());
    let workflow = ApprovalWorkflow::new(gateway, WorkflowSettings::default());
    let id = workflow
        .attach_report(
            &submitter(Role::Supervisor),
            "Blast permit",
            "",
            FileReference {
                name: "permit.pdf".to_string(),
                storage_key: "uploads/permit.pdf".to_string(),
                content_type: None,
            },
            filed_on(),
        )
        .expect("filed");
    let report = workflow
        .report(&id, OriginChannel::Supervisor)
        .expect("fetched");

    assert!(matches!(
        TravelDocumentExporter::default().export_report(&report),
        Err(ExportError::NotATravelLog(_))
    ));
}

#[test]
fn csv_import_feeds_a_draft_export() {
    let csv = "\
Date,From,To,Departure,Arrival,Purpose
2024-03-04, Depot , Quarry ,08:00,12:30,Survey
,,,,,
2024-03-05,Quarry,Depot,13:00,15:00,Return
";
    let entries = entries_from_reader(Cursor::new(csv)).expect("csv parses");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].origin_location, "Depot");

    let draft = TravelLogDraft::from_entries(entries, 70);
    let entries = draft.into_entries().expect("complete rows");
    let artifact = TravelDocumentExporter::default()
        .export_draft(&submitter(Role::Employee), &entries, filed_on())
        .expect("rendered");

    assert_eq!(artifact.file_name, "Lea_Santos_2024-03-05.xlsx");
    assert!(artifact.bytes.len() > 1000);
}
