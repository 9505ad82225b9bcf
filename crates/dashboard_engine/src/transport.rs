use std::time::Duration;

use bytes::Bytes;
use dashboard_core::{
    AcquisitionJob, Artifact, ArtifactId, ArtifactKind, DirectDownloadOutcome,
    DirectDownloadRequest, JobAcceptance, ReportStatus, ServiceHealth,
};
use dashboard_logging::{dashboard_debug, dashboard_trace};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{ClientError, DecodeError, FailureKind, Operation, TransportError};

#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Every endpoint path is appended to this, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Typed contract of the remote extraction service.
#[async_trait::async_trait]
pub trait ExtractionService: Send + Sync {
    async fn submit_job(&self, job: &AcquisitionJob) -> Result<JobAcceptance, ClientError>;

    async fn list_artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ClientError>;

    async fn fetch_payload(&self, kind: ArtifactKind, id: &ArtifactId)
        -> Result<Bytes, ClientError>;

    async fn trigger_report_generation(&self) -> Result<ReportStatus, ClientError>;

    async fn fetch_report_bundle(&self) -> Result<Bytes, ClientError>;

    async fn health(&self) -> Result<ServiceHealth, ClientError>;

    async fn request_direct_download(&self, url: &str)
        -> Result<DirectDownloadOutcome, ClientError>;

    async fn list_media(&self) -> Result<Vec<Artifact>, ClientError> {
        self.list_artifacts(ArtifactKind::Media).await
    }

    async fn list_documents(&self) -> Result<Vec<Artifact>, ClientError> {
        self.list_artifacts(ArtifactKind::Document).await
    }

    async fn fetch_media_payload(&self, id: &ArtifactId) -> Result<Bytes, ClientError> {
        self.fetch_payload(ArtifactKind::Media, id).await
    }

    async fn fetch_document_payload(&self, id: &ArtifactId) -> Result<Bytes, ClientError> {
        self.fetch_payload(ArtifactKind::Document, id).await
    }
}

/// [`ExtractionService`] over HTTP. Holds no state besides the base address
/// and the configured client, so one instance is shared by every component.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let base = Url::parse(settings.base_url.trim()).map_err(|err| {
            TransportError::new(Operation::HealthCheck, FailureKind::InvalidUrl, err.to_string())
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::new(
                Operation::HealthCheck,
                FailureKind::InvalidUrl,
                format!("{base} cannot carry endpoint paths"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| {
                TransportError::new(Operation::HealthCheck, FailureKind::Network, err.to_string())
            })?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, operation: Operation, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::new(operation, FailureKind::InvalidUrl, "base url has no path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Bytes, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|err| map_reqwest_error(operation, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = error_detail(&body)
                .or_else(|| status.canonical_reason().map(ToOwned::to_owned))
                .unwrap_or_default();
            return Err(TransportError::new(
                operation,
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(operation, err))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        segments: &[&str],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(operation, segments)?;
        dashboard_debug!("{} GET {}", operation, url);
        let body = self
            .send(operation, self.client.get(url).header(ACCEPT, "application/json"))
            .await?;
        Ok(decode_json(operation, &body)?)
    }

    async fn post_json<B, T>(
        &self,
        operation: Operation,
        segments: &[&str],
        payload: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(operation, segments)?;
        dashboard_debug!("{} POST {}", operation, url);
        let mut request = self.client.post(url).header(ACCEPT, "application/json");
        if let Some(payload) = payload {
            let body = serde_json::to_vec(payload).map_err(|err| DecodeError {
                operation,
                message: format!("request body: {err}"),
            })?;
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }
        let body = self.send(operation, request).await?;
        Ok(decode_json(operation, &body)?)
    }

    async fn get_bytes(&self, operation: Operation, segments: &[&str]) -> Result<Bytes, ClientError> {
        let url = self.endpoint(operation, segments)?;
        dashboard_debug!("{} GET {}", operation, url);
        let payload = self.send(operation, self.client.get(url)).await?;
        dashboard_trace!("{} received {} bytes", operation, payload.len());
        Ok(payload)
    }
}

#[async_trait::async_trait]
impl ExtractionService for HttpTransport {
    async fn submit_job(&self, job: &AcquisitionJob) -> Result<JobAcceptance, ClientError> {
        self.post_json(Operation::SubmitJob, &["scrape"], Some(job))
            .await
    }

    async fn list_artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ClientError> {
        self.get_json(Operation::list(kind), &[kind.collection_segment()])
            .await
    }

    async fn fetch_payload(
        &self,
        kind: ArtifactKind,
        id: &ArtifactId,
    ) -> Result<Bytes, ClientError> {
        self.get_bytes(
            Operation::fetch_payload(kind),
            &[kind.collection_segment(), id.as_str(), "download"],
        )
        .await
    }

    async fn trigger_report_generation(&self) -> Result<ReportStatus, ClientError> {
        self.post_json::<(), _>(Operation::TriggerReportGeneration, &["reports", "generate"], None)
            .await
    }

    async fn fetch_report_bundle(&self) -> Result<Bytes, ClientError> {
        self.get_bytes(Operation::FetchReportBundle, &["reports", "download"])
            .await
    }

    async fn health(&self) -> Result<ServiceHealth, ClientError> {
        self.get_json(Operation::HealthCheck, &["health"]).await
    }

    async fn request_direct_download(
        &self,
        url: &str,
    ) -> Result<DirectDownloadOutcome, ClientError> {
        let request = DirectDownloadRequest {
            url: url.to_string(),
        };
        self.post_json(Operation::DirectDownload, &["download"], Some(&request))
            .await
    }
}

fn decode_json<T: DeserializeOwned>(operation: Operation, body: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(|err| DecodeError {
        operation,
        message: err.to_string(),
    })
}

// The service reports failures as `{"detail": "..."}`.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("detail")?.as_str().map(ToOwned::to_owned)
}

fn map_reqwest_error(operation: Operation, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(operation, FailureKind::Timeout, err.to_string());
    }
    TransportError::new(operation, FailureKind::Network, err.to_string())
}
