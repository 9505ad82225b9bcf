#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use bytes::Bytes;
use dashboard_core::{
    AcceptanceStatus, AcquisitionJob, Artifact, ArtifactId, ArtifactKind, DirectDownloadOutcome,
    JobAcceptance, ReportStatus, ServiceHealth,
};
use dashboard_engine::{
    ClientError, ExtractionService, FailureKind, FileSaver, Notification, NotificationSink,
    Operation, SaveError, TransportError,
};
use tokio::sync::oneshot;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

pub fn transport_error(operation: Operation, kind: FailureKind) -> ClientError {
    ClientError::Transport(TransportError {
        operation,
        kind,
        message: "simulated".to_string(),
    })
}

pub fn artifact(id: u64, url: &str) -> Artifact {
    let mut artifact = Artifact::new(id, url);
    artifact.storage_object_key = Some(format!("objects/{id}"));
    artifact
}

pub type ListReply = Result<Vec<Artifact>, ClientError>;

/// In-memory extraction service with call counters.
#[derive(Default)]
pub struct FakeService {
    media: Mutex<Vec<Artifact>>,
    documents: Mutex<Vec<Artifact>>,
    list_failure: Mutex<Option<ClientError>>,
    scripted_lists: Mutex<VecDeque<oneshot::Receiver<ListReply>>>,
    acceptance: Mutex<Option<Result<JobAcceptance, ClientError>>>,
    submitted: Mutex<Vec<AcquisitionJob>>,
    payloads: Mutex<HashMap<ArtifactId, Bytes>>,
    direct: Mutex<Option<DirectDownloadOutcome>>,
    pub media_lists: AtomicUsize,
    pub document_lists: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub payload_calls: AtomicUsize,
    pub direct_calls: AtomicUsize,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&self, kind: ArtifactKind, items: Vec<Artifact>) {
        match kind {
            ArtifactKind::Media => *self.media.lock().unwrap() = items,
            ArtifactKind::Document => *self.documents.lock().unwrap() = items,
        }
    }

    pub fn fail_lists(&self, err: Option<ClientError>) {
        *self.list_failure.lock().unwrap() = err;
    }

    /// The next list call waits for the returned sender instead of answering.
    pub fn script_list(&self) -> oneshot::Sender<ListReply> {
        let (tx, rx) = oneshot::channel();
        self.scripted_lists.lock().unwrap().push_back(rx);
        tx
    }

    pub fn reply_to_submissions(&self, reply: Result<JobAcceptance, ClientError>) {
        *self.acceptance.lock().unwrap() = Some(reply);
    }

    pub fn submitted(&self) -> Vec<AcquisitionJob> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn set_payload(&self, id: impl Into<ArtifactId>, payload: &'static [u8]) {
        self.payloads
            .lock()
            .unwrap()
            .insert(id.into(), Bytes::from_static(payload));
    }

    pub fn reply_to_direct_downloads(&self, outcome: DirectDownloadOutcome) {
        *self.direct.lock().unwrap() = Some(outcome);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ExtractionService for FakeService {
    async fn submit_job(&self, job: &AcquisitionJob) -> Result<JobAcceptance, ClientError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(job.clone());
        let reply = self.acceptance.lock().unwrap().clone();
        reply.unwrap_or_else(|| {
            Ok(JobAcceptance {
                status: AcceptanceStatus::Accepted,
                message: "Started scraping".to_string(),
                task_id: None,
            })
        })
    }

    async fn list_artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ClientError> {
        match kind {
            ArtifactKind::Media => self.media_lists.fetch_add(1, Ordering::SeqCst),
            ArtifactKind::Document => self.document_lists.fetch_add(1, Ordering::SeqCst),
        };
        let scripted = self.scripted_lists.lock().unwrap().pop_front();
        if let Some(rx) = scripted {
            return rx
                .await
                .unwrap_or_else(|_| Err(transport_error(Operation::list(kind), FailureKind::Network)));
        }
        if let Some(err) = self.list_failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(match kind {
            ArtifactKind::Media => self.media.lock().unwrap().clone(),
            ArtifactKind::Document => self.documents.lock().unwrap().clone(),
        })
    }

    async fn fetch_payload(
        &self,
        kind: ArtifactKind,
        id: &ArtifactId,
    ) -> Result<Bytes, ClientError> {
        self.payload_calls.fetch_add(1, Ordering::SeqCst);
        let payload = self.payloads.lock().unwrap().get(id).cloned();
        payload.ok_or_else(|| {
            transport_error(Operation::fetch_payload(kind), FailureKind::HttpStatus(404))
        })
    }

    async fn trigger_report_generation(&self) -> Result<ReportStatus, ClientError> {
        Ok(ReportStatus {
            status: "success".to_string(),
            message: "Reports generated".to_string(),
        })
    }

    async fn fetch_report_bundle(&self) -> Result<Bytes, ClientError> {
        Ok(Bytes::from_static(b"PK\x03\x04report"))
    }

    async fn health(&self) -> Result<ServiceHealth, ClientError> {
        Ok(ServiceHealth {
            status: "healthy".to_string(),
            message: "fake".to_string(),
            version: None,
        })
    }

    async fn request_direct_download(
        &self,
        _url: &str,
    ) -> Result<DirectDownloadOutcome, ClientError> {
        self.direct_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.direct.lock().unwrap().clone();
        Ok(outcome.unwrap_or(DirectDownloadOutcome {
            success: true,
            message: "Successfully downloaded".to_string(),
            filename: None,
        }))
    }
}

/// Remembers every save; optionally refuses them.
#[derive(Default)]
pub struct RecordingSaver {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    refuse: Mutex<bool>,
}

impl RecordingSaver {
    pub fn refuse_saves(&self) {
        *self.refuse.lock().unwrap() = true;
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl FileSaver for RecordingSaver {
    fn save_as(&self, payload: &[u8], filename: &str) -> Result<PathBuf, SaveError> {
        if *self.refuse.lock().unwrap() {
            return Err(SaveError::OutputDir("read-only".to_string()));
        }
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), payload.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().drain(..).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
