use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::approvals::ServiceReport;
use super::document::{
    write_workbook, DocumentError, DocumentLayoutEngine, ImageAsset, LayoutOptions,
    TravelDocumentContent,
};
use super::domain::{Submitter, TravelEntry};
use crate::config::TravelConfig;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const FALLBACK_NAME: &str = "travel_log";

/// A rendered workbook ready to be written to disk or streamed to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn content_type(&self) -> mime::Mime {
        XLSX_CONTENT_TYPE
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM)
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("report {0} is not a travel log and has no printable form")]
    NotATravelLog(String),
}

/// Renders travel logs into the two-up authorization workbook.
#[derive(Debug, Clone, Default)]
pub struct TravelDocumentExporter {
    engine: DocumentLayoutEngine,
    logo_path: Option<PathBuf>,
}

impl TravelDocumentExporter {
    pub fn new(engine: DocumentLayoutEngine, logo_path: Option<PathBuf>) -> Self {
        Self { engine, logo_path }
    }

    pub fn from_config(config: &TravelConfig) -> Self {
        Self::new(
            DocumentLayoutEngine::new(LayoutOptions {
                overtime_rate: config.overtime_rate.clone(),
            }),
            config.logo_path.clone(),
        )
    }

    /// Render entries that have not been through the report service yet.
    pub fn export_draft(
        &self,
        submitter: &Submitter,
        entries: &[TravelEntry],
        filed_on: NaiveDate,
    ) -> Result<ExportArtifact, ExportError> {
        let content = TravelDocumentContent {
            submitter_name: submitter.name.clone(),
            submitter_position: submitter.position.clone(),
            filed_on,
            entries: entries.to_vec(),
            team_activity: Vec::new(),
            google_maps_hours: None,
            total_hours: None,
        };
        let suffix = filed_on.format("%Y-%m-%d").to_string();
        self.export(&content, artifact_file_name(&submitter.name, &suffix))
    }

    /// Render a travel log as fetched back from the report service.
    pub fn export_report(&self, report: &ServiceReport) -> Result<ExportArtifact, ExportError> {
        let log = report
            .travel_log()
            .ok_or_else(|| ExportError::NotATravelLog(report.id.to_string()))?;

        let content = TravelDocumentContent {
            submitter_name: report.submitter_name.clone(),
            submitter_position: report.submitter_position.clone(),
            filed_on: report.date_submitted,
            entries: log.entries.clone(),
            team_activity: log.team_activity.clone(),
            google_maps_hours: report.approval.google_maps_hours,
            total_hours: report.approval.total_hours,
        };
        self.export(
            &content,
            artifact_file_name(&report.submitter_name, &report.id.0),
        )
    }

    fn export(
        &self,
        content: &TravelDocumentContent,
        file_name: String,
    ) -> Result<ExportArtifact, ExportError> {
        let image = self.load_image();
        let grid = self.engine.render(content, image.is_some());
        let bytes = write_workbook(&grid, image.as_ref())?;

        info!(
            file_name = %file_name,
            entries = content.entries.len(),
            bytes = bytes.len(),
            "travel document rendered"
        );
        Ok(ExportArtifact { file_name, bytes })
    }

    fn load_image(&self) -> Option<ImageAsset> {
        let path = self.logo_path.as_ref()?;
        match ImageAsset::load(path) {
            Ok(asset) => Some(asset),
            Err(err) => {
                warn!(error = %err, "continuing without document image");
                None
            }
        }
    }
}

/// `<First>_<Rest>_<suffix>.xlsx` with anything outside `[A-Za-z0-9-]` dropped from each part.
pub fn artifact_file_name(submitter_name: &str, suffix: &str) -> String {
    let mut tokens = submitter_name.split_whitespace().map(sanitize);
    let first = tokens.next().unwrap_or_default();
    let rest: Vec<String> = tokens.filter(|token| !token.is_empty()).collect();

    let mut parts = Vec::with_capacity(3);
    if !first.is_empty() {
        parts.push(first);
    }
    if !rest.is_empty() {
        parts.push(rest.join("_"));
    }
    if parts.is_empty() {
        parts.push(FALLBACK_NAME.to_string());
    }

    let suffix = sanitize(suffix);
    if !suffix.is_empty() {
        parts.push(suffix);
    }
    format!("{}.xlsx", parts.join("_"))
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
        .collect()
}
