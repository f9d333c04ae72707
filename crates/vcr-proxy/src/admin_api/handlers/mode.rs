//! Mode handlers.

use crate::admin_api::types::{query_param, ModeRequest, ModeResponse};
use crate::metrics;
use crate::proxy::ProxyState;
use crate::recording::Mode;
use crate::response::{collect_body, error_response, json_response, ProxyBody};
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

/// GET /api/mode
pub fn handle_get(state: Arc<ProxyState>) -> Response<ProxyBody> {
    json_response(
        StatusCode::OK,
        &ModeResponse {
            mode: state.mode.get(),
            previous: None,
        },
    )
}

/// POST|PUT /api/mode - body `{"mode": "..."}` or `?mode=`
pub async fn handle_set<B>(req: Request<B>, state: Arc<ProxyState>) -> Response<ProxyBody>
where
    B: Body,
    B::Error: Display,
{
    let from_query = query_param(req.uri().query(), "mode");
    let body = match collect_body(req.into_body()).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let requested = if !body.is_empty() {
        match serde_json::from_slice::<ModeRequest>(&body) {
            Ok(r) => r.mode,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid mode JSON: {e}"),
                )
            }
        }
    } else if let Some(mode) = from_query {
        mode
    } else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing 'mode': send {\"mode\": \"record\"|\"playback\"} or ?mode=",
        );
    };

    let mode = match requested.parse::<Mode>() {
        Ok(m) => m,
        Err(e) => {
            warn!("Rejected mode change: {}", e);
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    // Setting the current mode again changes nothing, metrics included
    let previous = state.mode.set(mode);
    if previous != mode {
        metrics::record_mode_switch();
        info!("Mode changed: {} -> {}", previous, mode);
    }

    json_response(
        StatusCode::OK,
        &ModeResponse {
            mode,
            previous: Some(previous),
        },
    )
}
