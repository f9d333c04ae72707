//! Route dispatch logic for the Admin API.

use crate::admin_api::handlers::{mode, recordings, stats, system};
use crate::proxy::ProxyState;
use crate::response::{error_response, ProxyBody};
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Parsed admin route
#[derive(Debug, PartialEq, Eq)]
enum Route {
    /// GET /health
    Health,
    /// GET /metrics
    Metrics,
    /// GET/POST/PUT /api/mode
    Mode,
    /// GET /api/stats
    Stats,
    /// GET /api/history
    History,
    /// GET/DELETE /api/recordings
    Recordings,
    /// GET /api/recordings/:id
    RecordingById(String),
}

impl Route {
    fn parse(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        match path {
            "/health" => return Some(Route::Health),
            "/metrics" => return Some(Route::Metrics),
            _ => {}
        }

        let segments: Vec<&str> = path.strip_prefix("/api/")?.split('/').collect();
        match segments.as_slice() {
            ["mode"] => Some(Route::Mode),
            ["stats"] => Some(Route::Stats),
            ["history"] => Some(Route::History),
            ["recordings"] => Some(Route::Recordings),
            ["recordings", id] if !id.is_empty() => Some(Route::RecordingById(id.to_string())),
            _ => None,
        }
    }
}

fn not_found() -> Response<ProxyBody> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Main request router
pub async fn route_request<B>(req: Request<B>, state: Arc<ProxyState>) -> Response<ProxyBody>
where
    B: Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let query = req.uri().query().map(|s| s.to_string());

    debug!("Admin API: {} {}", method, req.uri().path());

    let Some(route) = Route::parse(req.uri().path()) else {
        return not_found();
    };

    match (&method, route) {
        (&Method::GET, Route::Health) => system::handle_health(),
        (&Method::GET, Route::Metrics) => system::handle_metrics(),

        (&Method::GET, Route::Mode) => mode::handle_get(state),
        (&Method::POST, Route::Mode) | (&Method::PUT, Route::Mode) => {
            mode::handle_set(req, state).await
        }

        (&Method::GET, Route::Stats) => stats::handle_stats(state),
        (&Method::GET, Route::History) => stats::handle_history(query.as_deref(), state),

        (&Method::GET, Route::Recordings) => recordings::handle_list(state),
        (&Method::DELETE, Route::Recordings) => recordings::handle_clear(state),
        (&Method::GET, Route::RecordingById(id)) => recordings::handle_get(&id, state),

        _ => not_found(),
    }
}
