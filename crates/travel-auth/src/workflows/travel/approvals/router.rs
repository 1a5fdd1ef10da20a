use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApprovalStatus, ReportId};
use super::gateway::{GatewayError, ReportGateway};
use super::queue::{QueueFilter, ReviewQueue};
use super::service::{ApprovalRequest, ApprovalWorkflow, ReviewOutcome, WorkflowError};
use crate::workflows::travel::domain::{
    FileReference, OriginChannel, ReviewerSession, Role, Submitter, TravelEntry,
};
use crate::workflows::travel::export::{ExportArtifact, ExportError, TravelDocumentExporter};

pub const REVIEWER_ID_HEADER: &str = "x-reviewer-id";
pub const REVIEWER_NAME_HEADER: &str = "x-reviewer-name";
pub const REVIEWER_ROLE_HEADER: &str = "x-reviewer-role";
pub const REPORT_ID_HEADER: &str = "x-report-id";

/// Shared handler state: the workflow plus the document exporter.
pub struct TravelApi<G> {
    workflow: Arc<ApprovalWorkflow<G>>,
    exporter: Arc<TravelDocumentExporter>,
}

impl<G> TravelApi<G> {
    pub fn new(workflow: Arc<ApprovalWorkflow<G>>, exporter: Arc<TravelDocumentExporter>) -> Self {
        Self { workflow, exporter }
    }
}

impl<G> Clone for TravelApi<G> {
    fn clone(&self) -> Self {
        Self {
            workflow: Arc::clone(&self.workflow),
            exporter: Arc::clone(&self.exporter),
        }
    }
}

/// Router exposing submission, review queue, decisions and document export.
pub fn travel_router<G>(api: TravelApi<G>) -> Router
where
    G: ReportGateway + 'static,
{
    Router::new()
        .route("/api/v1/travel-logs", post(submit_travel_log_handler::<G>))
        .route(
            "/api/v1/reports/attachments",
            post(attach_report_handler::<G>),
        )
        .route("/api/v1/reports", get(queue_handler::<G>))
        .route(
            "/api/v1/reports/:channel/:report_id",
            get(detail_handler::<G>),
        )
        .route(
            "/api/v1/reports/:channel/:report_id/approve",
            post(approve_handler::<G>),
        )
        .route(
            "/api/v1/reports/:channel/:report_id/reject",
            post(reject_handler::<G>),
        )
        .route(
            "/api/v1/reports/:channel/:report_id/document",
            get(document_handler::<G>),
        )
        .with_state(api)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TravelLogBody {
    pub submitter: Submitter,
    pub entries: Vec<TravelEntry>,
    #[serde(default)]
    pub submitted_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SubmitOptions {
    #[serde(default)]
    pub download: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttachmentBody {
    pub submitter: Submitter,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub file: FileReference,
    #[serde(default)]
    pub submitted_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueueQuery {
    #[serde(default)]
    pub status: Option<ApprovalStatus>,
    #[serde(default)]
    pub origin_channel: Option<OriginChannel>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApproveBody {
    #[serde(default)]
    pub google_maps_hours: Option<f32>,
    #[serde(default)]
    pub total_hours: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectBody {
    #[serde(default)]
    pub remarks: String,
}

pub(crate) async fn submit_travel_log_handler<G>(
    State(api): State<TravelApi<G>>,
    Query(options): Query<SubmitOptions>,
    axum::Json(body): axum::Json<TravelLogBody>,
) -> Response
where
    G: ReportGateway + 'static,
{
    let submitted_on = body
        .submitted_on
        .unwrap_or_else(|| Local::now().date_naive());

    // Render before the entries move into the submission.
    let artifact = if options.download {
        match api
            .exporter
            .export_draft(&body.submitter, &body.entries, submitted_on)
        {
            Ok(artifact) => Some(artifact),
            Err(error) => return export_error_response(error),
        }
    } else {
        None
    };

    let origin_channel = body.submitter.role.origin_channel();
    match api
        .workflow
        .submit_travel_log(&body.submitter, body.entries, submitted_on)
    {
        Ok(id) => match artifact {
            Some(artifact) => artifact_response(StatusCode::CREATED, artifact, Some(&id)),
            None => {
                let payload = json!({
                    "report_id": id,
                    "origin_channel": origin_channel,
                    "status": ApprovalStatus::Pending.label(),
                });
                (StatusCode::CREATED, axum::Json(payload)).into_response()
            }
        },
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn attach_report_handler<G>(
    State(api): State<TravelApi<G>>,
    axum::Json(body): axum::Json<AttachmentBody>,
) -> Response
where
    G: ReportGateway + 'static,
{
    let mut file = body.file;
    if file.content_type.is_none() {
        file.content_type = mime_guess::from_path(&file.name)
            .first()
            .map(|mime| mime.essence_str().to_string());
    }

    let submitted_on = body
        .submitted_on
        .unwrap_or_else(|| Local::now().date_naive());
    let origin_channel = body.submitter.role.origin_channel();
    match api.workflow.attach_report(
        &body.submitter,
        &body.title,
        &body.description,
        file,
        submitted_on,
    ) {
        Ok(id) => {
            let payload = json!({
                "report_id": id,
                "origin_channel": origin_channel,
                "status": ApprovalStatus::Pending.label(),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn queue_handler<G>(
    State(api): State<TravelApi<G>>,
    headers: HeaderMap,
    Query(query): Query<QueueQuery>,
) -> Response
where
    G: ReportGateway + 'static,
{
    let session = match reviewer_session(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let filter = QueueFilter {
        status: query.status,
        origin_channel: query.origin_channel,
        search: query.search,
    };
    match api
        .workflow
        .queue_page(&session, &filter, query.page.unwrap_or(1))
    {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn detail_handler<G>(
    State(api): State<TravelApi<G>>,
    headers: HeaderMap,
    Path((channel, report_id)): Path<(String, String)>,
) -> Response
where
    G: ReportGateway + 'static,
{
    let session = match reviewer_session(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let channel = match parse_channel(&channel) {
        Ok(channel) => channel,
        Err(response) => return response,
    };

    match api.workflow.open(&session, &ReportId(report_id), channel) {
        Ok(draft) => {
            let payload = json!({
                "actionable": draft.is_actionable(),
                "status_label": draft.report.status().label(),
                "kind_label": draft.report.kind().label(),
                "draft": draft,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn approve_handler<G>(
    State(api): State<TravelApi<G>>,
    headers: HeaderMap,
    Path((channel, report_id)): Path<(String, String)>,
    body: Option<axum::Json<ApproveBody>>,
) -> Response
where
    G: ReportGateway + 'static,
{
    let session = match reviewer_session(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let channel = match parse_channel(&channel) {
        Ok(channel) => channel,
        Err(response) => return response,
    };

    let body = body.map(|axum::Json(body)| body).unwrap_or_default();
    let request = ApprovalRequest {
        report_id: ReportId(report_id),
        origin_channel: channel,
        google_maps_hours: body.google_maps_hours,
        total_hours: body.total_hours,
    };
    match api.workflow.approve(&session, request) {
        Ok(outcome) => decision_response(&outcome),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn reject_handler<G>(
    State(api): State<TravelApi<G>>,
    headers: HeaderMap,
    Path((channel, report_id)): Path<(String, String)>,
    axum::Json(body): axum::Json<RejectBody>,
) -> Response
where
    G: ReportGateway + 'static,
{
    let session = match reviewer_session(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let channel = match parse_channel(&channel) {
        Ok(channel) => channel,
        Err(response) => return response,
    };

    let report_id = ReportId(report_id);
    match api
        .workflow
        .reject(&session, &report_id, channel, &body.remarks)
    {
        Ok(outcome) => decision_response(&outcome),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn document_handler<G>(
    State(api): State<TravelApi<G>>,
    Path((channel, report_id)): Path<(String, String)>,
) -> Response
where
    G: ReportGateway + 'static,
{
    let channel = match parse_channel(&channel) {
        Ok(channel) => channel,
        Err(response) => return response,
    };

    let report = match api.workflow.report(&ReportId(report_id), channel) {
        Ok(report) => report,
        Err(error) => return workflow_error_response(error),
    };
    match api.exporter.export_report(&report) {
        Ok(artifact) => artifact_response(StatusCode::OK, artifact, Some(&report.id)),
        Err(error) => export_error_response(error),
    }
}

fn decision_response(outcome: &ReviewOutcome) -> Response {
    let payload = json!({
        "decision": outcome.decision,
        "report": outcome.report().map(|report| report.summary_view()),
        "pending_count": outcome.queue.as_ref().map(ReviewQueue::pending_count),
        "queue_size": outcome.queue.as_ref().map(ReviewQueue::len),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn artifact_response(status: StatusCode, artifact: ExportArtifact, id: Option<&ReportId>) -> Response {
    let disposition = artifact.content_disposition();
    let content_type = artifact.content_type().to_string();
    let report_id = id.map(ToString::to_string).unwrap_or_default();
    (
        status,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::HeaderName::from_static(REPORT_ID_HEADER), report_id),
        ],
        artifact.bytes,
    )
        .into_response()
}

fn reviewer_session(headers: &HeaderMap) -> Result<ReviewerSession, Response> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let (Some(reviewer_id), Some(role)) = (read(REVIEWER_ID_HEADER), read(REVIEWER_ROLE_HEADER))
    else {
        let payload = json!({
            "error": format!("{REVIEWER_ID_HEADER} and {REVIEWER_ROLE_HEADER} headers are required"),
        });
        return Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response());
    };

    let role = role.parse::<Role>().map_err(|error| {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    })?;

    Ok(ReviewerSession {
        name: read(REVIEWER_NAME_HEADER).unwrap_or_else(|| reviewer_id.clone()),
        reviewer_id,
        role,
    })
}

fn parse_channel(raw: &str) -> Result<OriginChannel, Response> {
    raw.parse::<OriginChannel>().map_err(|error| {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
    })
}

pub(crate) fn workflow_error_status(error: &WorkflowError) -> StatusCode {
    match error {
        WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
        WorkflowError::Transition(_) => StatusCode::CONFLICT,
        WorkflowError::NotFound { .. } | WorkflowError::Gateway(GatewayError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        WorkflowError::Forbidden { .. } => StatusCode::FORBIDDEN,
        WorkflowError::Gateway(_) => StatusCode::BAD_GATEWAY,
    }
}

fn workflow_error_response(error: WorkflowError) -> Response {
    let status = workflow_error_status(&error);
    if status.is_server_error() {
        tracing::warn!(error = %error, "report service call failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn export_error_response(error: ExportError) -> Response {
    let status = match &error {
        ExportError::NotATravelLog(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ExportError::Document(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
