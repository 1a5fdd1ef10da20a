#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use travel_auth::workflows::travel::approvals::{
    ApprovalRecord, AttachmentReport, GatewayError, ReportBody, ReportGateway, ReportId,
    ReviewDecision, ServiceReport, TravelLog,
};
use travel_auth::workflows::travel::{
    AttachmentSubmission, OriginChannel, ReviewerSession, Role, Submitter, TravelEntry,
    TravelLogSubmission,
};

#[derive(Default)]
pub struct RecordingGateway {
    reports: Mutex<BTreeMap<(OriginChannel, ReportId), ServiceReport>>,
    decisions: Mutex<Vec<ReviewDecision>>,
}

impl RecordingGateway {
    pub fn decisions(&self) -> Vec<ReviewDecision> {
        self.decisions.lock().expect("decision mutex").clone()
    }

    fn store(
        &self,
        submitter: &Submitter,
        on: NaiveDate,
        body: ReportBody,
    ) -> Result<ReportId, GatewayError> {
        let channel = submitter
            .role
            .origin_channel()
            .ok_or_else(|| GatewayError::Rejected("not a filing role".to_string()))?;
        let mut reports = self.reports.lock().expect("report mutex");
        let id = ReportId((reports.len() + 1).to_string());
        reports.insert(
            (channel, id.clone()),
            ServiceReport {
                id: id.clone(),
                submitter_name: submitter.name.clone(),
                submitter_position: submitter.position.clone(),
                date_submitted: on,
                origin_channel: channel,
                approval: ApprovalRecord::pending(),
                body,
            },
        );
        Ok(id)
    }
}

impl ReportGateway for RecordingGateway {
    fn list_reports(&self, channel: OriginChannel) -> Result<Vec<ServiceReport>, GatewayError> {
        let reports = self.reports.lock().expect("report mutex");
        Ok(reports
            .iter()
            .filter(|((c, _), _)| *c == channel)
            .map(|(_, report)| report.clone())
            .collect())
    }

    fn report_detail(
        &self,
        id: &ReportId,
        channel: OriginChannel,
    ) -> Result<Option<ServiceReport>, GatewayError> {
        let reports = self.reports.lock().expect("report mutex");
        Ok(reports.get(&(channel, id.clone())).cloned())
    }

    fn submit_travel_log(&self, submission: TravelLogSubmission) -> Result<ReportId, GatewayError> {
        self.store(
            &submission.submitter,
            submission.submitted_on,
            ReportBody::TravelLog(TravelLog {
                entries: submission.entries,
                team_activity: Vec::new(),
            }),
        )
    }

    fn attach_report(&self, submission: AttachmentSubmission) -> Result<ReportId, GatewayError> {
        self.store(
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
        let mut reports = self.reports.lock().expect("report mutex");
        let report = reports
            .get_mut(&(decision.origin_channel, decision.report_id.clone()))
            .ok_or(GatewayError::NotFound)?;
        report.approval = ApprovalRecord::from_decision(&decision);
        self.decisions.lock().expect("decision mutex").push(decision);
        Ok(())
    }
}

pub fn filed_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date")
}

pub fn submitter(role: Role) -> Submitter {
    Submitter {
        user_id: format!("{}-1", role.label()),
        name: "Lea Santos".to_string(),
        position: "Surveyor".to_string(),
        role,
    }
}

pub fn admin() -> ReviewerSession {
    ReviewerSession {
        reviewer_id: "admin-1".to_string(),
        name: "Ops Admin".to_string(),
        role: Role::Admin,
    }
}

pub fn leg(departure: &str, arrival: &str, purpose: &str) -> TravelEntry {
    TravelEntry {
        date: "2024-03-04".to_string(),
        origin_location: "Depot".to_string(),
        destination_location: "Quarry".to_string(),
        departure_time: departure.to_string(),
        arrival_time: arrival.to_string(),
        purpose: purpose.to_string(),
    }
}
