//! Playback mode: answer from stored interactions.

use super::error::ProxyError;
use crate::recording::{Interaction, InteractionRepository, RecordedRequest, StorageError};
use std::sync::Arc;
use tracing::debug;

pub struct Player {
    repository: Arc<dyn InteractionRepository>,
}

impl Player {
    pub fn new(repository: Arc<dyn InteractionRepository>) -> Self {
        Self { repository }
    }

    /// Look up the stored interaction for `request`.
    ///
    /// `request` must be built exactly as the recorder builds it so both
    /// sides compute the same fingerprint.
    pub fn play(&self, request: &RecordedRequest) -> Result<Interaction, ProxyError> {
        let fingerprint = request.fingerprint();
        match self.repository.find(&fingerprint) {
            Ok(interaction) => {
                debug!(
                    "Replaying {} {} (status: {}, recorded: {})",
                    request.method,
                    request.url,
                    interaction.response.status_code,
                    interaction.timestamp
                );
                Ok(interaction)
            }
            Err(StorageError::NotFound(_)) => Err(ProxyError::NoRecording {
                method: request.method.clone(),
                url: request.url.clone(),
                fingerprint,
            }),
            Err(e) => Err(ProxyError::Storage(e)),
        }
    }
}
