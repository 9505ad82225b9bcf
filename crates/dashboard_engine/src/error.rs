use std::fmt;
use std::io;

use dashboard_core::{ArtifactId, EmptyRequest};
use thiserror::Error;

use crate::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Network failure, timeout or non-success status from the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub operation: Operation,
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(operation: Operation, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }
}

/// The service answered, but the body was not what the contract promises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed response body: {message}")]
pub struct DecodeError {
    pub operation: Operation,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClientError {
    pub fn operation(&self) -> Operation {
        match self {
            ClientError::Transport(err) => err.operation,
            ClientError::Decode(err) => err.operation,
        }
    }

    pub fn failure_kind(&self) -> Option<&FailureKind> {
        match self {
            ClientError::Transport(err) => Some(&err.kind),
            ClientError::Decode(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("refusing to save under name {0:?}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download of {item_id} is already in progress")]
    AlreadyInFlight { item_id: ArtifactId },
    #[error("download of {item_id} failed: {cause}")]
    DownloadFailed {
        item_id: ArtifactId,
        #[source]
        cause: ClientError,
    },
    #[error("could not save {filename}: {source}")]
    SaveFailed {
        filename: String,
        #[source]
        source: SaveError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("no URLs or keywords provided")]
    EmptyRequest,
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<EmptyRequest> for SubmissionError {
    fn from(_: EmptyRequest) -> Self {
        SubmissionError::EmptyRequest
    }
}
