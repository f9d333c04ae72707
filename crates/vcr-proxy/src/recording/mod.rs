//! Record/playback engine.
//!
//! - `record`: forward to the real target, persist the exchange
//! - `playback`: answer from persisted exchanges, never touch the network
//!
//! Requests are matched by fingerprint, `SHA-256(method ‖ url ‖ body)`.
//! Headers are deliberately left out of the match.
//!
//! # Module Structure
//!
//! - `mode` - Mode enum and the shared mode controller
//! - `types` - Interaction model and fingerprinting
//! - `store` - Repository trait with file and in-memory backends
//! - `stats` - Counters and bounded request history

mod mode;
mod stats;
mod store;
mod types;

pub use mode::{InvalidMode, Mode, ModeController};
pub use stats::{History, HistoryEntry, Statistics, StatsSnapshot, HISTORY_CAPACITY};
pub use store::{
    sanitize_host, FileRepository, InMemoryRepository, InteractionRepository, StorageError,
};
pub use types::{
    fingerprint, HeaderMultiMap, Interaction, InteractionMetadata, RecordedRequest,
    RecordedResponse,
};
