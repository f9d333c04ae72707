//! Upstream forwarding for record mode.
//!
//! `Upstream` is the seam between the recorder and the network. The real
//! implementation is `HttpUpstream`; tests substitute their own.

use super::headers::{is_outbound_skipped, to_multimap};
use crate::config::UpstreamConfig;
use crate::recording::{RecordedRequest, RecordedResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Transport-level forwarding failure
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UpstreamError(pub String);

/// Sends a buffered request to the real target and buffers the reply.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, request: &RecordedRequest) -> Result<RecordedResponse, UpstreamError>;
}

/// reqwest-backed upstream client
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder()
            // Redirects are part of the recorded exchange, never followed
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| UpstreamError(format!("Failed to build HTTP client: {e}")))?;

        info!(
            "Upstream client configured: connect_timeout={}s, timeout={}",
            config.connect_timeout_secs,
            config
                .timeout_secs
                .map(|t| format!("{t}s"))
                .unwrap_or_else(|| "none".to_string())
        );
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, request: &RecordedRequest) -> Result<RecordedResponse, UpstreamError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| UpstreamError(format!("Invalid method '{}'", request.method)))?;

        debug!("Forwarding to: {} {}", method, request.url);

        let mut outbound = self.client.request(method, &request.url);
        for (name, values) in &request.headers {
            if is_outbound_skipped(name) {
                continue;
            }
            for value in values {
                outbound = outbound.header(name.as_str(), value.as_str());
            }
        }
        if let Some(body) = &request.body {
            outbound = outbound.body(body.clone());
        }

        let response = outbound
            .send()
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = to_multimap(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError(format!("Failed to read upstream response: {e}")))?;

        Ok(RecordedResponse::new(status, headers, &body))
    }
}
