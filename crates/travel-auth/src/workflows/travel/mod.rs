//! Travel authorization: entry capture, duration rules, the printable form and its approval.

pub mod approvals;
pub mod document;
pub mod domain;
pub mod duration;
pub mod entries;
pub mod export;
pub mod import;

pub use domain::{
    AttachmentSubmission, FileReference, OriginChannel, ReviewerSession, Role, Submitter,
    TeamActivityEntry, TravelEntry, TravelLogSubmission,
};
pub use entries::{validate_entries, EntryField, TravelLogDraft, ValidationError};
pub use export::{artifact_file_name, ExportArtifact, ExportError, TravelDocumentExporter};
pub use import::{entries_from_path, entries_from_reader, EntryImportError};
