//! Statistics and history handlers.

use crate::admin_api::types::{query_param, HistoryResponse, StatsResponse};
use crate::proxy::ProxyState;
use crate::response::{error_response, json_response, ProxyBody};
use hyper::{Response, StatusCode};
use std::sync::Arc;
use tracing::error;

/// GET /api/stats
pub fn handle_stats(state: Arc<ProxyState>) -> Response<ProxyBody> {
    let recordings = match state.repository.count() {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to count recordings: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    json_response(
        StatusCode::OK,
        &StatsResponse {
            counters: state.stats.snapshot(),
            mode: state.mode.get(),
            recordings,
            history_size: state.history.len(),
            uptime_secs: state.uptime_secs(),
        },
    )
}

/// GET /api/history?limit=N - newest first
pub fn handle_history(query: Option<&str>, state: Arc<ProxyState>) -> Response<ProxyBody> {
    let limit = match query_param(query, "limit") {
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid limit '{raw}': expected a non-negative integer"),
                )
            }
        },
        None => None,
    };

    let history = state.history.recent(limit);
    json_response(
        StatusCode::OK,
        &HistoryResponse {
            count: history.len(),
            history,
        },
    )
}
