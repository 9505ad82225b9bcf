use std::path::PathBuf;
use std::sync::Arc;

use dashboard_core::{ArtifactId, ReportStatus, REPORT_FILENAME};
use dashboard_logging::{dashboard_info, dashboard_warn};

use crate::{
    ClientError, DownloadError, DownloadTracker, ExtractionService, FileSaver, Notification,
    NotificationSink, Operation,
};

/// Pseudo item id of the single report bundle in the in-flight set.
pub const REPORT_ITEM_ID: &str = "report-bundle";

/// Triggers report generation and downloads the resulting archive.
pub struct ReportController {
    service: Arc<dyn ExtractionService>,
    sink: Arc<dyn NotificationSink>,
    tracker: DownloadTracker,
    item_id: ArtifactId,
}

impl ReportController {
    pub fn new(
        service: Arc<dyn ExtractionService>,
        saver: Arc<dyn FileSaver>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            tracker: DownloadTracker::new(Operation::FetchReportBundle, saver, Arc::clone(&sink)),
            service,
            sink,
            item_id: ArtifactId::from(REPORT_ITEM_ID),
        }
    }

    pub async fn generate(&self) -> Result<ReportStatus, ClientError> {
        match self.service.trigger_report_generation().await {
            Ok(status) => {
                dashboard_info!("Report generation: {} ({})", status.status, status.message);
                Ok(status)
            }
            Err(err) => {
                dashboard_warn!("Report generation failed: {}", err);
                self.sink.notify(Notification::new(
                    Operation::TriggerReportGeneration,
                    err.to_string(),
                ));
                Err(err)
            }
        }
    }

    pub async fn download(&self) -> Result<PathBuf, DownloadError> {
        self.tracker
            .download(
                &self.item_id,
                || self.service.fetch_report_bundle(),
                REPORT_FILENAME,
            )
            .await
    }

    pub fn is_busy(&self) -> bool {
        self.tracker.is_busy(&self.item_id)
    }
}
