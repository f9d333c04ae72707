//! Failure taxonomy for proxied requests.

use crate::recording::StorageError;
use hyper::StatusCode;

/// Everything that can go wrong while serving a proxied request.
///
/// Each variant maps to exactly one status code; the proxy never retries.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Missing or malformed target, unreadable body
    #[error("{0}")]
    BadRequest(String),

    /// Playback lookup found nothing: the harness needs to (re-)record
    #[error("No recording found for {method} {url} (fingerprint {fingerprint})")]
    NoRecording {
        method: String,
        url: String,
        fingerprint: String,
    },

    /// Record mode could not reach the real target
    #[error("Failed to forward {method} {url}: {message}")]
    Upstream {
        method: String,
        url: String,
        message: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::NoRecording { .. } => StatusCode::NOT_FOUND,
            ProxyError::Upstream { .. } | ProxyError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::BadRequest(_) => "bad_request",
            ProxyError::NoRecording { .. } => "miss",
            ProxyError::Upstream { .. } => "upstream_error",
            ProxyError::Storage(_) => "storage_error",
        }
    }
}
