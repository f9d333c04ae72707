//! Admin REST API.
//!
//! Runs on its own listener (default port 2525) and never takes the proxy
//! dispatch lock. Provides:
//! - Mode inspection and switching
//! - Statistics and request history
//! - Listing, inspecting and clearing recordings
//! - Health and Prometheus metrics endpoints

mod handlers;
mod router;
mod server;
mod types;

pub use router::route_request;
pub use server::AdminApiServer;
