use serde::{Deserialize, Serialize};

/// Response of `POST /reports/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok" | "running")
    }
}

/// Body of `POST /download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectDownloadRequest {
    pub url: String,
}

/// Response of `POST /download`; the service finishes the download before answering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectDownloadOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
}
