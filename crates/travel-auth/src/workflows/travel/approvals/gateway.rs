use super::domain::{ReportId, ReviewDecision, ServiceReport};
use crate::workflows::travel::domain::{
    AttachmentSubmission, OriginChannel, TravelLogSubmission,
};

/// Remote API that owns report persistence. Every call may fail; nothing is retried.
pub trait ReportGateway: Send + Sync {
    fn list_reports(&self, channel: OriginChannel) -> Result<Vec<ServiceReport>, GatewayError>;
    fn report_detail(
        &self,
        id: &ReportId,
        channel: OriginChannel,
    ) -> Result<Option<ServiceReport>, GatewayError>;
    fn submit_travel_log(&self, submission: TravelLogSubmission) -> Result<ReportId, GatewayError>;
    fn attach_report(&self, submission: AttachmentSubmission) -> Result<ReportId, GatewayError>;
    /// Persist a status transition. Approve and reject share this one call.
    fn submit_review(&self, decision: ReviewDecision) -> Result<(), GatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("report not found")]
    NotFound,
    #[error("request rejected by report service: {0}")]
    Rejected(String),
    #[error("report service unavailable: {0}")]
    Unavailable(String),
}
