use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use dashboard_core::{resolve_filename, Artifact, ArtifactId, ArtifactKind, InFlightSet};
use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};

use crate::{
    ClientError, DownloadError, ExtractionService, FileSaver, Notification, NotificationSink,
    Operation,
};

/// Gates downloads so each item has at most one running at a time.
pub struct DownloadTracker {
    operation: Operation,
    in_flight: Arc<Mutex<InFlightSet>>,
    saver: Arc<dyn FileSaver>,
    sink: Arc<dyn NotificationSink>,
}

impl DownloadTracker {
    pub fn new(
        operation: Operation,
        saver: Arc<dyn FileSaver>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            operation,
            in_flight: Arc::new(Mutex::new(InFlightSet::new())),
            saver,
            sink,
        }
    }

    pub fn is_busy(&self, item_id: &ArtifactId) -> bool {
        lock(&self.in_flight).contains(item_id)
    }

    pub fn busy_ids(&self) -> Vec<ArtifactId> {
        lock(&self.in_flight).ids()
    }

    /// Fetches the payload with `fetch_payload` and saves it as `filename`.
    ///
    /// A second call for an item that is still running fails immediately
    /// with [`DownloadError::AlreadyInFlight`] and fetches nothing. The item
    /// is released on every exit path, including when the returned future
    /// is dropped half-way.
    pub async fn download<F, Fut>(
        &self,
        item_id: &ArtifactId,
        fetch_payload: F,
        filename: &str,
    ) -> Result<PathBuf, DownloadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, ClientError>>,
    {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, item_id) else {
            dashboard_info!("{} for {} ignored: already in progress", self.operation, item_id);
            return Err(DownloadError::AlreadyInFlight {
                item_id: item_id.clone(),
            });
        };
        dashboard_debug!("{} started for {}", self.operation, item_id);

        let payload = match fetch_payload().await {
            Ok(payload) => payload,
            Err(cause) => {
                dashboard_warn!("{} for {} failed: {}", self.operation, item_id, cause);
                self.sink
                    .notify(Notification::new(self.operation, cause.to_string()));
                return Err(DownloadError::DownloadFailed {
                    item_id: item_id.clone(),
                    cause,
                });
            }
        };

        match self.saver.save_as(&payload, filename) {
            Ok(path) => Ok(path),
            Err(source) => {
                dashboard_warn!("Saving {} failed: {}", filename, source);
                self.sink.notify(Notification::new(
                    self.operation,
                    format!("could not save {filename}: {source}"),
                ));
                Err(DownloadError::SaveFailed {
                    filename: filename.to_string(),
                    source,
                })
            }
        }
    }
}

/// Membership of one id in the in-flight set, released on drop.
struct InFlightGuard {
    set: Arc<Mutex<InFlightSet>>,
    item_id: ArtifactId,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<InFlightSet>>, item_id: &ArtifactId) -> Option<Self> {
        if !lock(set).try_begin(item_id) {
            return None;
        }
        Some(Self {
            set: Arc::clone(set),
            item_id: item_id.clone(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.set).finish(&self.item_id);
    }
}

fn lock(set: &Mutex<InFlightSet>) -> MutexGuard<'_, InFlightSet> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Download actions for one artifact kind, wired to the service.
pub struct ArtifactDownloads {
    kind: ArtifactKind,
    service: Arc<dyn ExtractionService>,
    tracker: DownloadTracker,
}

impl ArtifactDownloads {
    pub fn new(
        kind: ArtifactKind,
        service: Arc<dyn ExtractionService>,
        saver: Arc<dyn FileSaver>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            kind,
            service,
            tracker: DownloadTracker::new(Operation::fetch_payload(kind), saver, sink),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn is_busy(&self, item_id: &ArtifactId) -> bool {
        self.tracker.is_busy(item_id)
    }

    pub fn busy_ids(&self) -> Vec<ArtifactId> {
        self.tracker.busy_ids()
    }

    /// Downloads `artifact`, naming the file after `suggested_filename`, the
    /// artifact's own file name, or its source URL, in that order.
    pub async fn download(
        &self,
        artifact: &Artifact,
        suggested_filename: Option<&str>,
    ) -> Result<PathBuf, DownloadError> {
        let filename = resolve_filename(
            self.kind,
            &artifact.id,
            &artifact.source_url,
            suggested_filename.or(artifact.file_name.as_deref()),
        );
        self.tracker
            .download(
                &artifact.id,
                || self.service.fetch_payload(self.kind, &artifact.id),
                &filename,
            )
            .await
    }
}
