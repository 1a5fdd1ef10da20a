use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{ApprovalStatus, ReportId, ReviewDecision, ServiceReport, TransitionError};
use super::gateway::{GatewayError, ReportGateway};
use super::queue::{QueueFilter, QueuePage, ReviewQueue, DEFAULT_PAGE_SIZE};
use crate::config::TravelConfig;
use crate::workflows::travel::domain::{
    AttachmentSubmission, FileReference, OriginChannel, ReviewerSession, Role, Submitter,
    TravelEntry, TravelLogSubmission,
};
use crate::workflows::travel::entries::{validate_entries, ValidationError, DEFAULT_PURPOSE_MAX_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub page_size: usize,
    pub purpose_max_len: usize,
}

impl WorkflowSettings {
    pub fn from_config(config: &TravelConfig) -> Self {
        Self {
            page_size: config.page_size,
            purpose_max_len: config.purpose_max_len,
        }
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            purpose_max_len: DEFAULT_PURPOSE_MAX_LEN,
        }
    }
}

/// Reviewer's working copy of one report while it is open.
///
/// For travel logs `total_hours` starts at the computed suggestion and may be overridden before
/// confirming; whatever is confirmed is what gets persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDraft {
    pub report: ServiceReport,
    pub suggested_total_hours: Option<u32>,
    pub google_maps_hours: Option<f32>,
    pub total_hours: Option<u32>,
}

impl ReviewDraft {
    fn open(report: ServiceReport) -> Self {
        let suggested = report.travel_log().map(|log| log.computed_total_hours());
        let (google_maps_hours, total_hours) = if report.status().is_terminal() {
            (report.approval.google_maps_hours, report.approval.total_hours)
        } else {
            (None, suggested)
        };

        Self {
            report,
            suggested_total_hours: suggested,
            google_maps_hours,
            total_hours,
        }
    }

    /// Whether the approve/reject actions apply. Terminal reports are read-only.
    pub fn is_actionable(&self) -> bool {
        !self.report.status().is_terminal()
    }

    pub fn set_total_hours(&mut self, hours: u32) {
        self.total_hours = Some(hours);
    }

    pub fn set_google_maps_hours(&mut self, hours: Option<f32>) {
        self.google_maps_hours = hours;
    }

    /// Approval request carrying the hours currently on the draft.
    pub fn approval(&self) -> ApprovalRequest {
        ApprovalRequest {
            report_id: self.report.id.clone(),
            origin_channel: self.report.origin_channel,
            google_maps_hours: self.google_maps_hours,
            total_hours: self.total_hours,
        }
    }
}

/// Reviewer input for an approval. `total_hours: None` accepts the computed suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRequest {
    pub report_id: ReportId,
    pub origin_channel: OriginChannel,
    pub google_maps_hours: Option<f32>,
    pub total_hours: Option<u32>,
}

impl ApprovalRequest {
    pub fn accept_defaults(report_id: ReportId, origin_channel: OriginChannel) -> Self {
        Self {
            report_id,
            origin_channel,
            google_maps_hours: None,
            total_hours: None,
        }
    }
}

/// Service driving submissions and the Pending -> Approved | Rejected review.
pub struct ApprovalWorkflow<G> {
    gateway: Arc<G>,
    settings: WorkflowSettings,
}

impl<G> ApprovalWorkflow<G>
where
    G: ReportGateway + 'static,
{
    pub fn new(gateway: Arc<G>, settings: WorkflowSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> WorkflowSettings {
        self.settings
    }

    /// Validate and file a travel log through the submitter's channel.
    pub fn submit_travel_log(
        &self,
        submitter: &Submitter,
        entries: Vec<TravelEntry>,
        submitted_on: NaiveDate,
    ) -> Result<ReportId, WorkflowError> {
        let channel = filing_channel(submitter)?;
        validate_entries(&entries, self.settings.purpose_max_len)?;

        let entry_count = entries.len();
        let id = self.gateway.submit_travel_log(TravelLogSubmission {
            submitter: submitter.clone(),
            submitted_on,
            entries,
        })?;

        info!(report_id = %id, %channel, entries = entry_count, "travel log submitted");
        Ok(id)
    }

    pub fn attach_report(
        &self,
        submitter: &Submitter,
        title: &str,
        description: &str,
        file: FileReference,
        submitted_on: NaiveDate,
    ) -> Result<ReportId, WorkflowError> {
        let channel = filing_channel(submitter)?;
        if title.trim().is_empty() {
            return Err(ValidationError::IncompleteAttachment("title").into());
        }
        if file.name.trim().is_empty() || file.storage_key.trim().is_empty() {
            return Err(ValidationError::IncompleteAttachment("file").into());
        }

        let id = self.gateway.attach_report(AttachmentSubmission {
            submitter: submitter.clone(),
            submitted_on,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            file,
        })?;

        info!(report_id = %id, %channel, "attachment report submitted");
        Ok(id)
    }

    /// Fetch both channels and merge them into one queue.
    pub fn queue(&self) -> Result<ReviewQueue, WorkflowError> {
        let mut listings = Vec::with_capacity(OriginChannel::ordered().len());
        for channel in OriginChannel::ordered() {
            listings.push(self.gateway.list_reports(channel)?);
        }
        Ok(ReviewQueue::merge(listings))
    }

    /// One page of the filtered queue as shown to a reviewer.
    pub fn queue_page(
        &self,
        session: &ReviewerSession,
        filter: &QueueFilter,
        page: usize,
    ) -> Result<QueuePage, WorkflowError> {
        ensure_reviewer(session)?;
        Ok(self.queue()?.page(filter, page, self.settings.page_size))
    }

    /// Current server copy of one report.
    pub fn report(&self, id: &ReportId, channel: OriginChannel) -> Result<ServiceReport, WorkflowError> {
        self.gateway
            .report_detail(id, channel)?
            .ok_or_else(|| WorkflowError::NotFound {
                id: id.clone(),
                channel,
            })
    }

    /// Open a report for review with hours pre-filled.
    pub fn open(
        &self,
        session: &ReviewerSession,
        id: &ReportId,
        channel: OriginChannel,
    ) -> Result<ReviewDraft, WorkflowError> {
        ensure_reviewer(session)?;
        Ok(ReviewDraft::open(self.report(id, channel)?))
    }

    /// Approve a pending report. Once the decision is stored the call succeeds, even when the
    /// queue cannot be re-read afterwards.
    pub fn approve(
        &self,
        session: &ReviewerSession,
        request: ApprovalRequest,
    ) -> Result<ReviewOutcome, WorkflowError> {
        ensure_reviewer(session)?;
        let report = self.report(&request.report_id, request.origin_channel)?;
        let status = report.status().transition(ApprovalStatus::Approved)?;

        let (google_maps_hours, total_hours) = match report.travel_log() {
            Some(log) => (
                request.google_maps_hours,
                Some(
                    request
                        .total_hours
                        .unwrap_or_else(|| log.computed_total_hours()),
                ),
            ),
            None => {
                if request.google_maps_hours.is_some() || request.total_hours.is_some() {
                    debug!(report_id = %report.id, "hours ignored for attachment report");
                }
                (None, None)
            }
        };

        let decision = ReviewDecision {
            report_id: report.id.clone(),
            origin_channel: report.origin_channel,
            status,
            reviewer_id: session.reviewer_id.clone(),
            remarks: None,
            google_maps_hours,
            total_hours,
        };
        self.gateway.submit_review(decision.clone())?;

        info!(
            report_id = %report.id,
            channel = %report.origin_channel,
            status = status.label(),
            total_hours = ?total_hours,
            "report approved"
        );
        Ok(self.committed(decision))
    }

    /// Reject a pending report. Remarks are mandatory and checked before any remote call.
    pub fn reject(
        &self,
        session: &ReviewerSession,
        id: &ReportId,
        channel: OriginChannel,
        remarks: &str,
    ) -> Result<ReviewOutcome, WorkflowError> {
        let remarks = remarks.trim();
        if remarks.is_empty() {
            return Err(ValidationError::MissingRejectionRemarks.into());
        }
        ensure_reviewer(session)?;

        let report = self.report(id, channel)?;
        let status = report.status().transition(ApprovalStatus::Rejected)?;

        let decision = ReviewDecision {
            report_id: report.id.clone(),
            origin_channel: channel,
            status,
            reviewer_id: session.reviewer_id.clone(),
            remarks: Some(remarks.to_string()),
            google_maps_hours: None,
            total_hours: None,
        };
        self.gateway.submit_review(decision.clone())?;

        info!(report_id = %report.id, %channel, status = status.label(), "report rejected");
        Ok(self.committed(decision))
    }

    fn committed(&self, decision: ReviewDecision) -> ReviewOutcome {
        let queue = match self.queue() {
            Ok(queue) => Some(queue),
            Err(error) => {
                warn!(
                    report_id = %decision.report_id,
                    channel = %decision.origin_channel,
                    error = %error,
                    "decision stored but the queue could not be refreshed"
                );
                None
            }
        };
        ReviewOutcome { decision, queue }
    }
}

/// A stored review decision and the queue as re-read after it.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub decision: ReviewDecision,
    /// `None` when the refresh after the decision failed.
    pub queue: Option<ReviewQueue>,
}

impl ReviewOutcome {
    /// The decided report as listed by the refreshed queue.
    pub fn report(&self) -> Option<&ServiceReport> {
        self.queue
            .as_ref()?
            .find(&self.decision.report_id, self.decision.origin_channel)
    }
}

fn filing_channel(submitter: &Submitter) -> Result<OriginChannel, WorkflowError> {
    submitter
        .role
        .origin_channel()
        .ok_or(WorkflowError::Forbidden {
            role: submitter.role,
        })
}

fn ensure_reviewer(session: &ReviewerSession) -> Result<(), WorkflowError> {
    if session.role.can_review() {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden { role: session.role })
    }
}

/// Error raised by the approval workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("report {id} not found in the {channel} queue")]
    NotFound { id: ReportId, channel: OriginChannel },
    #[error("role '{}' is not allowed to perform this action", .role.label())]
    Forbidden { role: Role },
}
