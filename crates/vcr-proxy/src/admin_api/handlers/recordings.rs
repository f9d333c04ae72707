//! Recording handlers.

use crate::admin_api::types::{ClearResponse, RecordingsResponse};
use crate::proxy::ProxyState;
use crate::recording::StorageError;
use crate::response::{error_response, json_response, ProxyBody};
use hyper::{Response, StatusCode};
use std::sync::Arc;
use tracing::{error, info};

/// GET /api/recordings
pub fn handle_list(state: Arc<ProxyState>) -> Response<ProxyBody> {
    match state.repository.find_all() {
        Ok(recordings) => json_response(
            StatusCode::OK,
            &RecordingsResponse {
                count: recordings.len(),
                recordings,
            },
        ),
        Err(e) => {
            error!("Failed to list recordings: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// GET /api/recordings/{id} - by interaction id or fingerprint
pub fn handle_get(key: &str, state: Arc<ProxyState>) -> Response<ProxyBody> {
    match state.repository.find(key) {
        Ok(interaction) => json_response(StatusCode::OK, &interaction),
        Err(StorageError::NotFound(_)) => error_response(
            StatusCode::NOT_FOUND,
            &format!("Recording '{key}' not found"),
        ),
        Err(e) => {
            error!("Failed to read recording {}: {}", key, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// DELETE /api/recordings
pub fn handle_clear(state: Arc<ProxyState>) -> Response<ProxyBody> {
    let before = state.repository.count().unwrap_or(0);
    match state.repository.clear() {
        Ok(()) => {
            info!("Cleared {} recordings", before);
            json_response(StatusCode::OK, &ClearResponse { cleared: before })
        }
        Err(e) => {
            error!("Failed to clear recordings: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}
