use std::path::PathBuf;
use std::sync::Arc;

use dashboard_core::{ArtifactKind, DashboardViewModel, ServiceHealth};
use dashboard_logging::dashboard_info;

use crate::{
    ArtifactDownloads, ClientError, CollectionController, ControllerRegistration,
    CoordinatorSettings, DirectorySaver, ExtractionService, FileSaver, HttpTransport,
    JobSubmissionCoordinator, NotificationSink, Notification, Operation, ReportController,
    TransportError, TransportSettings,
};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub transport: TransportSettings,
    pub coordinator: CoordinatorSettings,
    pub download_dir: PathBuf,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            transport: TransportSettings::default(),
            coordinator: CoordinatorSettings::default(),
            download_dir: PathBuf::from("downloads"),
        }
    }
}

/// Composition root: one transport shared by a controller, a download
/// tracker per artifact kind, the report controller and the coordinator.
///
/// Constructing it mounts the views; dropping it unregisters the
/// controllers and cancels pending refreshes.
pub struct Dashboard {
    service: Arc<dyn ExtractionService>,
    sink: Arc<dyn NotificationSink>,
    media: Arc<CollectionController>,
    documents: Arc<CollectionController>,
    media_downloads: ArtifactDownloads,
    document_downloads: ArtifactDownloads,
    reports: ReportController,
    _registrations: Vec<ControllerRegistration>,
    coordinator: JobSubmissionCoordinator,
}

impl Dashboard {
    pub fn new(
        settings: DashboardSettings,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(settings.transport)?;
        dashboard_info!("Dashboard connected to {}", transport.base_url());
        let saver = Arc::new(DirectorySaver::new(settings.download_dir));
        Ok(Self::with_parts(
            Arc::new(transport),
            saver,
            sink,
            settings.coordinator,
        ))
    }

    pub fn with_parts(
        service: Arc<dyn ExtractionService>,
        saver: Arc<dyn FileSaver>,
        sink: Arc<dyn NotificationSink>,
        coordinator_settings: CoordinatorSettings,
    ) -> Self {
        let media = Arc::new(CollectionController::new(
            ArtifactKind::Media,
            Arc::clone(&service),
            Arc::clone(&sink),
        ));
        let documents = Arc::new(CollectionController::new(
            ArtifactKind::Document,
            Arc::clone(&service),
            Arc::clone(&sink),
        ));
        let coordinator = JobSubmissionCoordinator::new(
            Arc::clone(&service),
            Arc::clone(&sink),
            coordinator_settings,
        );
        let registrations = vec![
            coordinator.register(media.clone()),
            coordinator.register(documents.clone()),
        ];

        Self {
            media_downloads: ArtifactDownloads::new(
                ArtifactKind::Media,
                Arc::clone(&service),
                Arc::clone(&saver),
                Arc::clone(&sink),
            ),
            document_downloads: ArtifactDownloads::new(
                ArtifactKind::Document,
                Arc::clone(&service),
                Arc::clone(&saver),
                Arc::clone(&sink),
            ),
            reports: ReportController::new(Arc::clone(&service), saver, Arc::clone(&sink)),
            service,
            sink,
            media,
            documents,
            _registrations: registrations,
            coordinator,
        }
    }

    pub fn collection(&self, kind: ArtifactKind) -> &Arc<CollectionController> {
        match kind {
            ArtifactKind::Media => &self.media,
            ArtifactKind::Document => &self.documents,
        }
    }

    pub fn downloads(&self, kind: ArtifactKind) -> &ArtifactDownloads {
        match kind {
            ArtifactKind::Media => &self.media_downloads,
            ArtifactKind::Document => &self.document_downloads,
        }
    }

    pub fn coordinator(&self) -> &JobSubmissionCoordinator {
        &self.coordinator
    }

    pub fn reports(&self) -> &ReportController {
        &self.reports
    }

    /// Initial load of both collections; failures are reported per collection.
    pub async fn refresh_all(&self) {
        let _ = tokio::join!(self.media.refresh(), self.documents.refresh());
    }

    pub async fn health(&self) -> Result<ServiceHealth, ClientError> {
        self.service.health().await.inspect_err(|err| {
            self.sink
                .notify(Notification::new(Operation::HealthCheck, err.to_string()));
        })
    }

    pub fn view(&self) -> DashboardViewModel {
        DashboardViewModel {
            media: self.media.current_state(),
            documents: self.documents.current_state(),
            busy_media: self.media_downloads.busy_ids(),
            busy_documents: self.document_downloads.busy_ids(),
            report_busy: self.reports.is_busy(),
        }
    }
}
