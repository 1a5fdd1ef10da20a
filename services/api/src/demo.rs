use crate::infra::{parse_date, InMemoryReportGateway};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use travel_auth::config::AppConfig;
use travel_auth::error::AppError;
use travel_auth::workflows::travel::approvals::{
    ApprovalStatus, ApprovalWorkflow, QueueFilter, ReviewQueue, WorkflowError, WorkflowSettings,
};
use travel_auth::workflows::travel::{
    entries_from_path, ExportArtifact, FileReference, OriginChannel, ReviewerSession, Role,
    Submitter, TeamActivityEntry, TravelDocumentExporter, TravelEntry, TravelLogDraft,
};

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// CSV of travel entries with a Date,From,To,Departure,Arrival,Purpose header
    #[arg(long)]
    pub(crate) entries: PathBuf,
    /// Submitter name printed on the form
    #[arg(long)]
    pub(crate) name: String,
    /// Submitter position printed on the form
    #[arg(long)]
    pub(crate) position: String,
    /// Filing date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) filed_on: Option<NaiveDate>,
    /// Directory the workbook is written to
    #[arg(long, default_value = ".")]
    pub(crate) output_dir: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Filing date used for the demo reports (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Write the approved travel log workbook into this directory
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Override the computed total hours when approving the demo travel log
    #[arg(long)]
    pub(crate) total_hours: Option<u32>,
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        entries,
        name,
        position,
        filed_on,
        output_dir,
    } = args;

    let config = AppConfig::load()?.travel;
    let filed_on = filed_on.unwrap_or_else(|| Local::now().date_naive());
    let draft = TravelLogDraft::from_entries(entries_from_path(&entries)?, config.purpose_max_len);
    let entries = draft
        .into_entries()
        .map_err(|err| AppError::Workflow(WorkflowError::from(err)))?;

    let submitter = Submitter {
        user_id: "cli".to_string(),
        name,
        position,
        role: Role::Employee,
    };
    let exporter = TravelDocumentExporter::from_config(&config);
    let artifact = exporter.export_draft(&submitter, &entries, filed_on)?;
    let path = write_artifact(&output_dir, &artifact)?;

    println!(
        "Wrote {} ({} entries, {} bytes)",
        path.display(),
        entries.len(),
        artifact.bytes.len()
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        output_dir,
        total_hours,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let gateway = Arc::new(InMemoryReportGateway::default());
    let workflow = ApprovalWorkflow::new(gateway.clone(), WorkflowSettings::default());
    let exporter = TravelDocumentExporter::default();

    println!("Travel authorization demo ({today})");

    let employee = Submitter {
        user_id: "emp-1001".to_string(),
        name: "Ana Reyes".to_string(),
        position: "Field Technician".to_string(),
        role: Role::Employee,
    };
    let supervisor = Submitter {
        user_id: "sup-2001".to_string(),
        name: "Ben Cruz".to_string(),
        position: "Crew Supervisor".to_string(),
        role: Role::Supervisor,
    };
    let admin = ReviewerSession {
        reviewer_id: "adm-3001".to_string(),
        name: "Carla Diaz".to_string(),
        role: Role::Admin,
    };

    let travel_id = workflow.submit_travel_log(&employee, demo_entries(), today)?;
    println!("\nFiled travel log {travel_id} via the employee channel");

    let supervisor_log = workflow.submit_travel_log(&supervisor, demo_entries(), today)?;
    gateway
        .file_team_activity(
            OriginChannel::Supervisor,
            &supervisor_log,
            demo_team_activity(),
        )
        .map_err(|err| AppError::Workflow(err.into()))?;
    println!("Filed travel log {supervisor_log} with team activity via the supervisor channel");

    let attachment_id = workflow.attach_report(
        &supervisor,
        "Crew roster",
        "Roster for the March substation work",
        FileReference {
            name: "roster.pdf".to_string(),
            storage_key: "uploads/roster.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
        },
        today,
    )?;
    println!("Filed attachment {attachment_id} via the supervisor channel");

    render_queue("Review queue", &workflow.queue()?);

    let mut draft = workflow.open(&admin, &travel_id, OriginChannel::Employee)?;
    println!(
        "\nOpened {} for review: suggested total {} h",
        travel_id,
        draft.suggested_total_hours.unwrap_or_default()
    );
    if let Some(hours) = total_hours {
        draft.set_total_hours(hours);
        println!("  Reviewer override: {hours} h");
    }
    let approval = workflow.approve(&admin, draft.approval())?;
    println!(
        "Approved {} with {} h",
        approval.decision.report_id,
        approval.decision.total_hours.unwrap_or_default()
    );

    let rejection = workflow.reject(
        &admin,
        &attachment_id,
        OriginChannel::Supervisor,
        "Roster is missing the night shift",
    )?;
    let queue = match rejection.queue {
        Some(queue) => queue,
        None => workflow.queue()?,
    };
    render_queue("Review queue after decisions", &queue);

    let pending_supervisor = QueueFilter {
        status: Some(ApprovalStatus::Pending),
        origin_channel: Some(OriginChannel::Supervisor),
        search: None,
    };
    let still_pending = queue.filtered(&pending_supervisor).count();
    println!("\nPending supervisor reports: {still_pending}");

    if let Some(dir) = output_dir {
        let approved = workflow.report(&travel_id, OriginChannel::Employee)?;
        let artifact = exporter.export_report(&approved)?;
        let path = write_artifact(&dir, &artifact)?;
        println!("Wrote approved travel log to {}", path.display());
    }

    Ok(())
}

fn render_queue(title: &str, queue: &ReviewQueue) {
    println!("\n{title} ({} pending of {})", queue.pending_count(), queue.len());
    for report in queue.reports() {
        let view = report.summary_view();
        let hours = view
            .total_hours
            .map(|hours| format!(" | {hours} h"))
            .unwrap_or_default();
        let remarks = view
            .remarks
            .as_deref()
            .map(|remarks| format!(" | \"{remarks}\""))
            .unwrap_or_default();
        println!(
            "  - [{}] #{} {} | {} | {}{}{}",
            view.origin_channel,
            view.id,
            view.kind_label,
            view.submitter_name,
            view.status_label,
            hours,
            remarks
        );
    }
}

fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)?;
    Ok(path)
}

fn demo_entries() -> Vec<TravelEntry> {
    let leg = |date: &str, from: &str, to: &str, departure: &str, arrival: &str, purpose: &str| {
        TravelEntry {
            date: date.to_string(),
            origin_location: from.to_string(),
            destination_location: to.to_string(),
            departure_time: departure.to_string(),
            arrival_time: arrival.to_string(),
            purpose: purpose.to_string(),
        }
    };

    vec![
        leg("2024-03-01", "Head Office", "North Substation", "22:00", "02:00", "Transformer inspection"),
        leg("2024-03-02", "North Substation", "Relay Yard", "23:30", "05:15", "Emergency line repair"),
        leg("2024-03-04", "Head Office", "East Feeder", "09:00", "17:30", "Site survey"),
    ]
}

fn demo_team_activity() -> Vec<TeamActivityEntry> {
    vec![
        TeamActivityEntry {
            employee_name: "Dan Lim".to_string(),
            designation: "Lineman".to_string(),
            assigned_task: "Pole replacement".to_string(),
            time_duration: "6 h".to_string(),
            remarks: "Completed".to_string(),
        },
        TeamActivityEntry {
            employee_name: "Eva Tan".to_string(),
            designation: "Electrician".to_string(),
            assigned_task: "Meter audit".to_string(),
            time_duration: "4 h".to_string(),
            remarks: "Follow-up needed".to_string(),
        },
    ]
}
