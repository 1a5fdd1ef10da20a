//! Two-channel review queue and the Pending -> Approved | Rejected workflow.

pub mod domain;
pub mod gateway;
pub mod queue;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApprovalRecord, ApprovalStatus, AttachmentReport, ReportBody, ReportId, ReportKind,
    ReportSummaryView, ReviewDecision, ServiceReport, TransitionError, TravelLog,
};
pub use gateway::{GatewayError, ReportGateway};
pub use queue::{QueueFilter, QueuePage, ReviewQueue, DEFAULT_PAGE_SIZE};
pub use router::{travel_router, TravelApi};
pub use service::{
    ApprovalRequest, ApprovalWorkflow, ReviewDraft, ReviewOutcome, WorkflowError,
    WorkflowSettings,
};
