//! Record mode: forward to the real target, persist the exchange.

use super::error::ProxyError;
use super::target::Target;
use super::upstream::Upstream;
use crate::metrics;
use crate::recording::{Interaction, InteractionRepository, RecordedRequest};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

pub struct Recorder {
    upstream: Arc<dyn Upstream>,
    repository: Arc<dyn InteractionRepository>,
}

impl Recorder {
    pub fn new(upstream: Arc<dyn Upstream>, repository: Arc<dyn InteractionRepository>) -> Self {
        Self {
            upstream,
            repository,
        }
    }

    /// Forward `request` and store the resulting interaction.
    ///
    /// Nothing is stored when the forward fails. A store failure is reported
    /// even though the live response is known.
    pub async fn record(
        &self,
        request: RecordedRequest,
        target: &Target,
    ) -> Result<Interaction, ProxyError> {
        let start = Instant::now();
        let response = self.upstream.send(&request).await.map_err(|e| {
            error!("Failed to forward {} {}: {}", request.method, request.url, e);
            ProxyError::Upstream {
                method: request.method.clone(),
                url: request.url.clone(),
                message: e.0,
            }
        })?;
        let duration_ms = start.elapsed().as_millis() as u64;
        metrics::record_upstream_duration(response.status_code, duration_ms as f64);

        let interaction = Interaction::new(request, response, target.host.clone(), duration_ms);
        self.repository.store(&interaction).map_err(|e| {
            error!("Failed to store recording {}: {}", interaction.id, e);
            ProxyError::Storage(e)
        })?;

        debug!(
            "Recorded {} {} (status: {}, latency: {}ms, fingerprint: {})",
            interaction.request.method,
            interaction.request.url,
            interaction.response.status_code,
            duration_ms,
            interaction.fingerprint()
        );
        Ok(interaction)
    }
}
