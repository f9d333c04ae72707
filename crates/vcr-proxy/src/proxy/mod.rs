//! The recording proxy.
//!
//! Requests arrive as `ANY /<path>?target=<url>`. In record mode the
//! [`Recorder`] forwards them to the real target and stores the exchange;
//! in playback mode the [`Player`] answers from storage without touching
//! the network.
//!
//! # Module Structure
//!
//! - `server` - accept loop
//! - `handler` - serialized dispatch, statistics and history
//! - `recorder` / `player` - the two modes
//! - `upstream` - outbound HTTP client
//! - `target` - `target` query parameter resolution
//! - `state` - state shared with the admin API

mod error;
mod handler;
pub(crate) mod headers;
mod player;
mod recorder;
mod server;
mod state;
mod target;
mod upstream;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ProxyError;
pub use handler::ProxyHandler;
pub use player::Player;
pub use recorder::Recorder;
pub use server::ProxyServer;
pub use state::ProxyState;
pub use target::Target;
pub use upstream::{HttpUpstream, Upstream, UpstreamError};
