use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::travel::approvals::{
    travel_router, ApprovalRecord, ApprovalWorkflow, AttachmentReport, GatewayError, ReportBody,
    ReportGateway, ReportId, ReviewDecision, ServiceReport, TravelApi, TravelLog,
    WorkflowSettings,
};
use crate::workflows::travel::domain::{
    AttachmentSubmission, FileReference, OriginChannel, ReviewerSession, Role, Submitter,
    TravelEntry, TravelLogSubmission,
};
use crate::workflows::travel::export::TravelDocumentExporter;

pub(super) fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date")
}

pub(super) fn submitter(role: Role) -> Submitter {
    let (user_id, name, position) = match role {
        Role::Employee => ("emp-1", "Ana Reyes", "Field Technician"),
        Role::Supervisor => ("sup-1", "Ben Cruz", "Crew Supervisor"),
        Role::Admin => ("adm-1", "Carla Diaz", "HR Administrator"),
    };
    Submitter {
        user_id: user_id.to_string(),
        name: name.to_string(),
        position: position.to_string(),
        role,
    }
}

pub(super) fn reviewer() -> ReviewerSession {
    ReviewerSession {
        reviewer_id: "adm-1".to_string(),
        name: "Carla Diaz".to_string(),
        role: Role::Admin,
    }
}

pub(super) fn entry(date: &str, departure: &str, arrival: &str, purpose: &str) -> TravelEntry {
    TravelEntry {
        date: date.to_string(),
        origin_location: "Head Office".to_string(),
        destination_location: "North Substation".to_string(),
        departure_time: departure.to_string(),
        arrival_time: arrival.to_string(),
        purpose: purpose.to_string(),
    }
}

/// Two overnight legs (4h and 5h) and one same-day leg (8h).
pub(super) fn three_entries() -> Vec<TravelEntry> {
    vec![
        entry("2024-03-01", "22:00", "02:00", "Transformer inspection"),
        entry("2024-03-02", "23:30", "05:15", "Emergency line repair"),
        entry("2024-03-04", "09:00", "17:30", "Site survey"),
    ]
}

pub(super) const THREE_ENTRY_TOTAL: u32 = 17;

pub(super) fn file(name: &str) -> FileReference {
    FileReference {
        name: name.to_string(),
        storage_key: format!("uploads/{name}"),
        content_type: None,
    }
}

pub(super) fn build_workflow() -> (ApprovalWorkflow<MemoryGateway>, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::default());
    let workflow = ApprovalWorkflow::new(gateway.clone(), WorkflowSettings::default());
    (workflow, gateway)
}

pub(super) fn router_with(gateway: Arc<MemoryGateway>) -> axum::Router {
    let workflow = ApprovalWorkflow::new(gateway, WorkflowSettings::default());
    travel_router(TravelApi::new(
        Arc::new(workflow),
        Arc::new(TravelDocumentExporter::default()),
    ))
}

/// In-memory report service. Ids are sequential per channel, like the real one.
#[derive(Default)]
pub(super) struct MemoryGateway {
    reports: Mutex<BTreeMap<(OriginChannel, ReportId), ServiceReport>>,
    reviews: Mutex<Vec<ReviewDecision>>,
    calls: AtomicUsize,
    listings_down: AtomicBool,
}

impl MemoryGateway {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn reviews(&self) -> Vec<ReviewDecision> {
        self.reviews.lock().expect("review mutex poisoned").clone()
    }

    /// Listing fails from now on; detail lookups and reviews keep working.
    pub(super) fn fail_listings(&self) {
        self.listings_down.store(true, Ordering::SeqCst);
    }

    pub(super) fn seed(&self, report: ServiceReport) {
        self.reports
            .lock()
            .expect("report mutex poisoned")
            .insert((report.origin_channel, report.id.clone()), report);
    }

    fn insert(
        &self,
        submitter: &Submitter,
        submitted_on: NaiveDate,
        body: ReportBody,
    ) -> Result<ReportId, GatewayError> {
        let channel = submitter
            .role
            .origin_channel()
            .ok_or_else(|| GatewayError::Rejected("admins cannot file reports".to_string()))?;
        let mut reports = self.reports.lock().expect("report mutex poisoned");
        let next = reports.keys().filter(|(c, _)| *c == channel).count() + 1;
        let id = ReportId(format!("{}-{next}", &channel.label()[..3]));
        reports.insert(
            (channel, id.clone()),
            ServiceReport {
                id: id.clone(),
                submitter_name: submitter.name.clone(),
                submitter_position: submitter.position.clone(),
                date_submitted: submitted_on,
                origin_channel: channel,
                approval: ApprovalRecord::pending(),
                body,
            },
        );
        Ok(id)
    }
}

impl ReportGateway for MemoryGateway {
    fn list_reports(&self, channel: OriginChannel) -> Result<Vec<ServiceReport>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.listings_down.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("listing timed out".to_string()));
        }
        let reports = self.reports.lock().expect("report mutex poisoned");
        Ok(reports
            .values()
            .filter(|report| report.origin_channel == channel)
            .cloned()
            .collect())
    }

    fn report_detail(
        &self,
        id: &ReportId,
        channel: OriginChannel,
    ) -> Result<Option<ServiceReport>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reports = self.reports.lock().expect("report mutex poisoned");
        Ok(reports.get(&(channel, id.clone())).cloned())
    }

    fn submit_travel_log(&self, submission: TravelLogSubmission) -> Result<ReportId, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.insert(
            &submission.submitter,
            submission.submitted_on,
            ReportBody::TravelLog(TravelLog {
                entries: submission.entries,
                team_activity: Vec::new(),
            }),
        )
    }

    fn attach_report(&self, submission: AttachmentSubmission) -> Result<ReportId, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.insert(
            &submission.submitter,
            submission.submitted_on,
            ReportBody::Attachment(AttachmentReport {
                title: submission.title,
                description: submission.description,
                file: submission.file,
            }),
        )
    }

    fn submit_review(&self, decision: ReviewDecision) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut reports = self.reports.lock().expect("report mutex poisoned");
        let report = reports
            .get_mut(&(decision.origin_channel, decision.report_id.clone()))
            .ok_or(GatewayError::NotFound)?;
        report.approval = ApprovalRecord::from_decision(&decision);
        self.reviews
            .lock()
            .expect("review mutex poisoned")
            .push(decision);
        Ok(())
    }
}

pub(super) struct UnavailableGateway;

impl ReportGateway for UnavailableGateway {
    fn list_reports(&self, _channel: OriginChannel) -> Result<Vec<ServiceReport>, GatewayError> {
        Err(GatewayError::Unavailable("connection refused".to_string()))
    }

    fn report_detail(
        &self,
        _id: &ReportId,
        _channel: OriginChannel,
    ) -> Result<Option<ServiceReport>, GatewayError> {
        Err(GatewayError::Unavailable("connection refused".to_string()))
    }

    fn submit_travel_log(&self, _submission: TravelLogSubmission) -> Result<ReportId, GatewayError> {
        Err(GatewayError::Unavailable("connection refused".to_string()))
    }

    fn attach_report(&self, _submission: AttachmentSubmission) -> Result<ReportId, GatewayError> {
        Err(GatewayError::Unavailable("connection refused".to_string()))
    }

    fn submit_review(&self, _decision: ReviewDecision) -> Result<(), GatewayError> {
        Err(GatewayError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn travel_report(
    id: &str,
    channel: OriginChannel,
    submitted: NaiveDate,
    name: &str,
) -> ServiceReport {
    ServiceReport {
        id: ReportId(id.to_string()),
        submitter_name: name.to_string(),
        submitter_position: "Technician".to_string(),
        date_submitted: submitted,
        origin_channel: channel,
        approval: ApprovalRecord::pending(),
        body: ReportBody::TravelLog(TravelLog {
            entries: three_entries(),
            team_activity: Vec::new(),
        }),
    }
}

pub(super) fn attachment_report(
    id: &str,
    channel: OriginChannel,
    submitted: NaiveDate,
    name: &str,
) -> ServiceReport {
    ServiceReport {
        id: ReportId(id.to_string()),
        submitter_name: name.to_string(),
        submitter_position: "Technician".to_string(),
        date_submitted: submitted,
        origin_channel: channel,
        approval: ApprovalRecord::pending(),
        body: ReportBody::Attachment(AttachmentReport {
            title: "Site photos".to_string(),
            description: "Before and after".to_string(),
            file: file("photos.zip"),
        }),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
