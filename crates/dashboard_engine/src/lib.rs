//! Dashboard engine: transport, controllers and the operations that drive them.
mod collection;
mod coordinator;
mod dashboard;
mod error;
mod notify;
mod report;
mod save;
mod tracker;
mod transport;
mod types;

pub use collection::{CollectionController, Refresh};
pub use coordinator::{ControllerRegistration, CoordinatorSettings, JobSubmissionCoordinator};
pub use dashboard::{Dashboard, DashboardSettings};
pub use error::{
    ClientError, DecodeError, DownloadError, FailureKind, SaveError, SubmissionError,
    TransportError,
};
pub use notify::{ChannelNotificationSink, LogNotificationSink, NotificationSink};
pub use report::{ReportController, REPORT_ITEM_ID};
pub use save::{ensure_output_dir, AtomicFileWriter, DirectorySaver, FileSaver};
pub use tracker::{ArtifactDownloads, DownloadTracker};
pub use transport::{ExtractionService, HttpTransport, TransportSettings};
pub use types::{Notification, Operation};
