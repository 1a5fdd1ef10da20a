use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use travel_auth::workflows::travel::approvals::{
    ApprovalRecord, AttachmentReport, GatewayError, ReportBody, ReportGateway, ReportId,
    ReviewDecision, ServiceReport, TravelLog,
};
use travel_auth::workflows::travel::{
    AttachmentSubmission, OriginChannel, Submitter, TeamActivityEntry, TravelLogSubmission,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct ChannelStore {
    next_id: u64,
    reports: BTreeMap<ReportId, ServiceReport>,
}

/// Process-local stand-in for the report service. Each channel keeps its own id sequence.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReportGateway {
    employee: Arc<Mutex<ChannelStore>>,
    supervisor: Arc<Mutex<ChannelStore>>,
}

impl InMemoryReportGateway {
    fn store(&self, channel: OriginChannel) -> &Mutex<ChannelStore> {
        match channel {
            OriginChannel::Employee => &self.employee,
            OriginChannel::Supervisor => &self.supervisor,
        }
    }

    fn insert(
        &self,
        submitter: &Submitter,
        submitted_on: NaiveDate,
        body: ReportBody,
    ) -> Result<ReportId, GatewayError> {
        let channel = submitter.role.origin_channel().ok_or_else(|| {
            GatewayError::Rejected(format!("role '{}' cannot file reports", submitter.role.label()))
        })?;

        let mut store = self.store(channel).lock().expect("report store mutex poisoned");
        store.next_id += 1;
        let id = ReportId(store.next_id.to_string());
        store.reports.insert(
            id.clone(),
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

    /// Attach team activity rows to a stored travel log.
    pub(crate) fn file_team_activity(
        &self,
        channel: OriginChannel,
        id: &ReportId,
        rows: Vec<TeamActivityEntry>,
    ) -> Result<(), GatewayError> {
        let mut store = self.store(channel).lock().expect("report store mutex poisoned");
        let report = store.reports.get_mut(id).ok_or(GatewayError::NotFound)?;
        match &mut report.body {
            ReportBody::TravelLog(log) => {
                log.team_activity = rows;
                Ok(())
            }
            ReportBody::Attachment(_) => Err(GatewayError::Rejected(
                "team activity only applies to travel logs".to_string(),
            )),
        }
    }
}

impl ReportGateway for InMemoryReportGateway {
    fn list_reports(&self, channel: OriginChannel) -> Result<Vec<ServiceReport>, GatewayError> {
        let store = self.store(channel).lock().expect("report store mutex poisoned");
        Ok(store.reports.values().cloned().collect())
    }

    fn report_detail(
        &self,
        id: &ReportId,
        channel: OriginChannel,
    ) -> Result<Option<ServiceReport>, GatewayError> {
        let store = self.store(channel).lock().expect("report store mutex poisoned");
        Ok(store.reports.get(id).cloned())
    }

    fn submit_travel_log(&self, submission: TravelLogSubmission) -> Result<ReportId, GatewayError> {
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
        let mut store = self
            .store(decision.origin_channel)
            .lock()
            .expect("report store mutex poisoned");
        let report = store
            .reports
            .get_mut(&decision.report_id)
            .ok_or(GatewayError::NotFound)?;
        if report.approval.status.is_terminal() {
            return Err(GatewayError::Rejected(format!(
                "report {} is already {}",
                report.id,
                report.approval.status.label()
            )));
        }
        report.approval = ApprovalRecord::from_decision(&decision);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
