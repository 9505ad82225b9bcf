use std::fmt;

use dashboard_core::ArtifactKind;

/// Remote capabilities of the extraction service, named for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SubmitJob,
    ListMedia,
    ListDocuments,
    FetchMediaPayload,
    FetchDocumentPayload,
    TriggerReportGeneration,
    FetchReportBundle,
    HealthCheck,
    DirectDownload,
}

impl Operation {
    pub fn list(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Media => Operation::ListMedia,
            ArtifactKind::Document => Operation::ListDocuments,
        }
    }

    pub fn fetch_payload(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Media => Operation::FetchMediaPayload,
            ArtifactKind::Document => Operation::FetchDocumentPayload,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::SubmitJob => "submit job",
            Operation::ListMedia => "list media",
            Operation::ListDocuments => "list documents",
            Operation::FetchMediaPayload => "download media",
            Operation::FetchDocumentPayload => "download document",
            Operation::TriggerReportGeneration => "generate reports",
            Operation::FetchReportBundle => "download reports",
            Operation::HealthCheck => "health check",
            Operation::DirectDownload => "direct download",
        };
        f.write_str(name)
    }
}

/// A user-facing failure report naming the operation that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub operation: Operation,
    pub message: String,
}

impl Notification {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}
