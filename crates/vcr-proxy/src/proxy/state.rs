//! Shared state for the proxy and admin listeners.

use crate::recording::{History, InteractionRepository, Mode, ModeController, Statistics};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Everything both listeners read and write.
///
/// Built once in `main` and handed out behind an `Arc`. Each field carries
/// its own lock, so admin reads never wait on an in-flight proxy request.
pub struct ProxyState {
    pub mode: ModeController,
    pub stats: Statistics,
    pub history: History,
    pub repository: Arc<dyn InteractionRepository>,
    pub started_at: DateTime<Utc>,
}

impl ProxyState {
    pub fn new(initial_mode: Mode, repository: Arc<dyn InteractionRepository>) -> Self {
        Self {
            mode: ModeController::new(initial_mode),
            stats: Statistics::new(),
            history: History::new(),
            repository,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
