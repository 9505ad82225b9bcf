//! Dashboard core: IO-free domain model, collection snapshots and view-model helpers.
mod artifact;
mod collection;
mod filename;
mod in_flight;
mod job;
mod remote;
mod view_model;

pub use artifact::{Artifact, ArtifactId, ArtifactKind};
pub use collection::{CollectionModel, CollectionState, RefreshOutcome, RefreshTicket};
pub use filename::{fallback_filename, resolve_filename, REPORT_FILENAME};
pub use in_flight::InFlightSet;
pub use job::{AcceptanceStatus, AcquisitionJob, EmptyRequest, JobAcceptance};
pub use remote::{DirectDownloadOutcome, DirectDownloadRequest, ReportStatus, ServiceHealth};
pub use view_model::{ArtifactRowView, DashboardViewModel};
