use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use dashboard_core::{AcquisitionJob, ArtifactKind, DirectDownloadOutcome, JobAcceptance};
use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    ExtractionService, Notification, NotificationSink, Operation, Refresh, SubmissionError,
};

#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// How long after an accepted submission the registered collections re-fetch.
    pub refresh_delay: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    targets: BTreeMap<u64, Arc<dyn Refresh>>,
}

impl Registry {
    fn snapshot(&self, kind: Option<ArtifactKind>) -> Vec<Arc<dyn Refresh>> {
        self.targets
            .values()
            .filter(|target| kind.is_none_or(|kind| target.kind() == kind))
            .cloned()
            .collect()
    }
}

/// Keeps a controller registered for post-submission refreshes; dropping
/// it unregisters the controller.
pub struct ControllerRegistration {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl ControllerRegistration {
    pub fn unregister(self) {}
}

impl Drop for ControllerRegistration {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).targets.remove(&self.id);
        }
    }
}

/// Sends acquisition jobs and, once one is accepted, tells every
/// registered collection to re-fetch after a fixed delay.
///
/// The delay is a heuristic: the remote job may still be running when the
/// refresh fires, and an empty result at that point is not an error.
pub struct JobSubmissionCoordinator {
    service: Arc<dyn ExtractionService>,
    sink: Arc<dyn NotificationSink>,
    settings: CoordinatorSettings,
    registry: Arc<Mutex<Registry>>,
    shutdown: CancellationToken,
}

impl JobSubmissionCoordinator {
    pub fn new(
        service: Arc<dyn ExtractionService>,
        sink: Arc<dyn NotificationSink>,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            service,
            sink,
            settings,
            registry: Arc::new(Mutex::new(Registry::default())),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn register(&self, target: Arc<dyn Refresh>) -> ControllerRegistration {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.targets.insert(id, target);
        ControllerRegistration {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    pub fn registered_count(&self) -> usize {
        lock(&self.registry).targets.len()
    }

    /// Validates and sends a job. Blank entries are dropped first; if
    /// nothing is left the service is never contacted.
    pub async fn submit<U, K>(&self, urls: U, keywords: K) -> Result<JobAcceptance, SubmissionError>
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let job = match AcquisitionJob::from_raw(urls, keywords) {
            Ok(job) => job,
            Err(err) => {
                self.sink
                    .notify(Notification::new(Operation::SubmitJob, err.to_string()));
                return Err(err.into());
            }
        };
        dashboard_info!(
            "Submitting job: {} url(s), {} keyword(s)",
            job.urls().len(),
            job.keywords().len()
        );

        let acceptance = match self.service.submit_job(&job).await {
            Ok(acceptance) => acceptance,
            Err(err) => {
                dashboard_warn!("Submission failed: {}", err);
                self.sink
                    .notify(Notification::new(Operation::SubmitJob, err.to_string()));
                return Err(err.into());
            }
        };

        if acceptance.is_accepted() {
            dashboard_info!("Job accepted: {}", acceptance.message);
            self.schedule_refresh();
        } else {
            dashboard_warn!("Job rejected: {}", acceptance.message);
            self.sink.notify(Notification::new(
                Operation::SubmitJob,
                format!("rejected: {}", acceptance.message),
            ));
        }
        Ok(acceptance)
    }

    /// Asks the service to fetch one media URL right away. The service only
    /// answers once the file is stored, so media collections refresh
    /// immediately on success.
    pub async fn download_now(&self, url: &str) -> Result<DirectDownloadOutcome, SubmissionError> {
        let url = url.trim();
        if url.is_empty() {
            self.sink.notify(Notification::new(
                Operation::DirectDownload,
                SubmissionError::EmptyRequest.to_string(),
            ));
            return Err(SubmissionError::EmptyRequest);
        }

        let outcome = match self.service.request_direct_download(url).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.sink
                    .notify(Notification::new(Operation::DirectDownload, err.to_string()));
                return Err(err.into());
            }
        };

        if outcome.success {
            let targets = lock(&self.registry).snapshot(Some(ArtifactKind::Media));
            refresh_targets(&targets).await;
        } else {
            self.sink
                .notify(Notification::new(Operation::DirectDownload, outcome.message.clone()));
        }
        Ok(outcome)
    }

    /// Starts the one-shot delayed refresh. The task resolves to the number
    /// of controllers refreshed, zero if it was cancelled first.
    pub fn schedule_refresh(&self) -> JoinHandle<usize> {
        let registry = Arc::clone(&self.registry);
        let shutdown = self.shutdown.clone();
        let delay = self.settings.refresh_delay;
        dashboard_debug!("Refresh scheduled in {:?}", delay);

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    dashboard_debug!("Scheduled refresh cancelled");
                    0
                }
                _ = tokio::time::sleep(delay) => {
                    // Read the registry at fire time so controllers torn
                    // down during the delay are skipped.
                    let targets = lock(&registry).snapshot(None);
                    dashboard_info!("Refreshing {} collection(s) after submission", targets.len());
                    refresh_targets(&targets).await;
                    targets.len()
                }
            }
        })
    }

    /// Cancels every pending delayed refresh.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for JobSubmissionCoordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn refresh_targets(targets: &[Arc<dyn Refresh>]) {
    // Failures were already reported by each controller.
    let _ = join_all(targets.iter().map(|target| target.refresh())).await;
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
