//! Proxy request handling.
//!
//! Every proxied request goes through one mutex: target resolution, body
//! buffering, the record or playback dispatch and the bookkeeping that
//! follows all happen while it is held. Admin endpoints never take it.

use super::error::ProxyError;
use super::headers::to_multimap;
use super::player::Player;
use super::recorder::Recorder;
use super::state::ProxyState;
use super::target::Target;
use super::upstream::Upstream;
use crate::metrics;
use crate::recording::{HistoryEntry, Interaction, Mode, RecordedRequest};
use crate::response::{collect_body, error_response, replay_response, ProxyBody};
use chrono::Utc;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub struct ProxyHandler {
    state: Arc<ProxyState>,
    recorder: Recorder,
    player: Player,
    dispatch_lock: Arc<Mutex<()>>,
}

impl ProxyHandler {
    pub fn new(state: Arc<ProxyState>, upstream: Arc<dyn Upstream>) -> Self {
        let recorder = Recorder::new(upstream, Arc::clone(&state.repository));
        let player = Player::new(Arc::clone(&state.repository));
        Self {
            state,
            recorder,
            player,
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn state(&self) -> &Arc<ProxyState> {
        &self.state
    }

    /// Serve one proxied request.
    ///
    /// Never fails: every error is turned into a JSON error response. Once
    /// the request is buffered the dispatch runs in its own task, so a client
    /// that disconnects mid-request does not abort the forward or the store.
    pub async fn handle<B>(self: Arc<Self>, req: Request<B>) -> Response<ProxyBody>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Display,
    {
        let start = Instant::now();
        let guard = Arc::clone(&self.dispatch_lock).lock_owned().await;

        let (parts, body) = req.into_parts();
        debug!("Received request: {} {}", parts.method, parts.uri);

        let target = match Target::from_query(parts.uri.query()) {
            Ok(t) => t,
            Err(e) => return self.fail(self.state.mode.get(), e, start),
        };
        let body = match collect_body(body).await {
            Ok(b) => b,
            Err(e) => {
                return self.fail(self.state.mode.get(), ProxyError::BadRequest(e), start)
            }
        };

        let request = RecordedRequest::new(
            parts.method.as_str(),
            target.url.clone(),
            to_multimap(&parts.headers),
            &body,
        );

        let handler = Arc::clone(&self);
        let dispatch = tokio::spawn(async move {
            let _guard = guard;
            handler.dispatch(request, target, start).await
        });

        match dispatch.await {
            Ok(response) => response,
            Err(e) => {
                error!("Proxy dispatch task failed: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Proxy dispatch failed")
            }
        }
    }

    async fn dispatch(
        &self,
        request: RecordedRequest,
        target: Target,
        start: Instant,
    ) -> Response<ProxyBody> {
        let mode = self.state.mode.get();
        let result = match mode {
            Mode::Record => self.recorder.record(request, &target).await,
            Mode::Playback => self.player.play(&request),
        };

        match result {
            Ok(interaction) => self.complete(mode, &interaction, start),
            Err(e) => self.fail(mode, e, start),
        }
    }

    fn complete(
        &self,
        mode: Mode,
        interaction: &Interaction,
        start: Instant,
    ) -> Response<ProxyBody> {
        let elapsed = start.elapsed();
        let (recorded, outcome, duration_ms) = match mode {
            Mode::Record => {
                self.state.stats.record_stored();
                (true, "recorded", interaction.metadata.duration_ms)
            }
            Mode::Playback => {
                self.state.stats.playback_hit();
                (false, "hit", elapsed.as_millis() as u64)
            }
        };

        self.state.history.push(HistoryEntry {
            id: interaction.id.clone(),
            timestamp: Utc::now(),
            method: interaction.request.method.clone(),
            url: interaction.request.url.clone(),
            target: interaction.metadata.target.clone(),
            status: interaction.response.status_code,
            duration_ms,
            recorded,
        });
        metrics::record_request(mode.as_str(), outcome, elapsed.as_secs_f64() * 1000.0);

        info!(
            "{} {} {} -> {} ({}ms)",
            if recorded { "Recorded" } else { "Replayed" },
            interaction.request.method,
            interaction.request.url,
            interaction.response.status_code,
            duration_ms
        );
        replay_response(&interaction.response)
    }

    fn fail(&self, mode: Mode, err: ProxyError, start: Instant) -> Response<ProxyBody> {
        match &err {
            ProxyError::NoRecording { .. } => {
                self.state.stats.playback_miss();
                warn!("{}", err);
            }
            ProxyError::BadRequest(_) => debug!("Rejected proxy request: {}", err),
            _ => error!("Proxy request failed: {}", err),
        }
        metrics::record_request(
            mode.as_str(),
            err.kind(),
            start.elapsed().as_secs_f64() * 1000.0,
        );
        error_response(err.status(), &err.to_string())
    }
}
