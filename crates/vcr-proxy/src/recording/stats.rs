//! In-memory statistics and request history.
//!
//! Both live for the lifetime of the process and are independent of the
//! repository: clearing recordings does not reset them.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;

/// Maximum number of history entries retained
pub const HISTORY_CAPACITY: usize = 1000;

/// Snapshot of the proxy counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub record_count: u64,
    pub playback_hits: u64,
    pub playback_misses: u64,
}

/// Monotonic counters, reset only by restart
#[derive(Debug, Default)]
pub struct Statistics {
    counters: RwLock<StatsSnapshot>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_stored(&self) {
        self.counters.write().record_count += 1;
    }

    pub fn playback_hit(&self) {
        self.counters.write().playback_hits += 1;
    }

    pub fn playback_miss(&self) {
        self.counters.write().playback_misses += 1;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.counters.read()
    }
}

/// Summary of one successfully proxied request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Id of the interaction that was stored or replayed
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub target: String,
    pub status: u16,
    pub duration_ms: u64,
    /// `true` if this call stored a new interaction, `false` for a replay
    pub recorded: bool,
}

/// Bounded most-recent-first log
#[derive(Debug)]
pub struct History {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity.min(HISTORY_CAPACITY))),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entry past capacity
    pub fn push(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Newest first, at most `limit` entries
    pub fn recent(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let entries = self.entries.read();
        let limit = limit.unwrap_or(entries.len());
        entries.iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
