use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::travel::domain::{
    FileReference, OriginChannel, TeamActivityEntry, TravelEntry,
};
use crate::workflows::travel::duration;

/// Identifier assigned by the collaborator API. Unique within an origin channel only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl ReportId {
    /// Issue order: numeric ids compare as numbers, anything else as text.
    pub fn sequence_cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(left), Ok(right)) => left.cmp(&right),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review status. Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }

    /// Check `self -> next` against the state machine and return the new status.
    pub fn transition(self, next: ApprovalStatus) -> Result<ApprovalStatus, TransitionError> {
        match (self, next) {
            (ApprovalStatus::Pending, ApprovalStatus::Approved | ApprovalStatus::Rejected) => {
                Ok(next)
            }
            (ApprovalStatus::Pending, ApprovalStatus::Pending) => Err(TransitionError::NoChange),
            (from @ (ApprovalStatus::Approved | ApprovalStatus::Rejected), _) => {
                Err(TransitionError::Terminal { from })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("report is already {} and cannot change", .from.label())]
    Terminal { from: ApprovalStatus },
    #[error("a pending report can only be approved or rejected")]
    NoChange,
}

/// Reviewer outcome attached to every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_hours: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<u32>,
}

impl ApprovalRecord {
    pub fn pending() -> Self {
        Self {
            status: ApprovalStatus::Pending,
            reviewer_id: None,
            remarks: None,
            google_maps_hours: None,
            total_hours: None,
        }
    }

    /// Record as persisted after `decision` is accepted.
    pub fn from_decision(decision: &ReviewDecision) -> Self {
        Self {
            status: decision.status,
            reviewer_id: Some(decision.reviewer_id.clone()),
            remarks: decision.remarks.clone(),
            google_maps_hours: decision.google_maps_hours,
            total_hours: decision.total_hours,
        }
    }
}

/// Legs and optional team rows of a travel log report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelLog {
    pub entries: Vec<TravelEntry>,
    #[serde(default)]
    pub team_activity: Vec<TeamActivityEntry>,
}

impl TravelLog {
    /// Suggested payable hours: each leg floored, then summed.
    pub fn computed_total_hours(&self) -> u32 {
        duration::total_hours(&self.entries)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentReport {
    pub title: String,
    pub description: String,
    pub file: FileReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportBody {
    TravelLog(TravelLog),
    Attachment(AttachmentReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    TravelLog,
    Attachment,
}

impl ReportKind {
    pub const fn label(self) -> &'static str {
        match self {
            ReportKind::TravelLog => "Travel Log",
            ReportKind::Attachment => "Attachment",
        }
    }
}

/// Shared envelope for reports from either origin channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub id: ReportId,
    pub submitter_name: String,
    pub submitter_position: String,
    pub date_submitted: NaiveDate,
    pub origin_channel: OriginChannel,
    pub approval: ApprovalRecord,
    pub body: ReportBody,
}

impl ServiceReport {
    pub fn kind(&self) -> ReportKind {
        match self.body {
            ReportBody::TravelLog(_) => ReportKind::TravelLog,
            ReportBody::Attachment(_) => ReportKind::Attachment,
        }
    }

    pub fn status(&self) -> ApprovalStatus {
        self.approval.status
    }

    pub fn travel_log(&self) -> Option<&TravelLog> {
        match &self.body {
            ReportBody::TravelLog(log) => Some(log),
            ReportBody::Attachment(_) => None,
        }
    }

    pub fn summary_view(&self) -> ReportSummaryView {
        ReportSummaryView {
            id: self.id.clone(),
            origin_channel: self.origin_channel,
            kind: self.kind(),
            kind_label: self.kind().label(),
            submitter_name: self.submitter_name.clone(),
            submitter_position: self.submitter_position.clone(),
            date_submitted: self.date_submitted,
            status: self.status(),
            status_label: self.status().label(),
            remarks: self.approval.remarks.clone(),
            total_hours: self.approval.total_hours,
        }
    }
}

/// Row shown in the review queue.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummaryView {
    pub id: ReportId,
    pub origin_channel: OriginChannel,
    pub kind: ReportKind,
    pub kind_label: &'static str,
    pub submitter_name: String,
    pub submitter_position: String,
    pub date_submitted: NaiveDate,
    pub status: ApprovalStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<u32>,
}

/// The single mutation payload sent to the collaborator for every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub report_id: ReportId,
    pub origin_channel: OriginChannel,
    pub status: ApprovalStatus,
    pub reviewer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_hours: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<u32>,
}
