//! Record/playback HTTP proxy.
//!
//! In record mode every request is forwarded to its real target and the
//! exchange is persisted; in playback mode requests are answered from the
//! persisted exchanges, matched by a fingerprint of method, URL and body.

pub mod admin_api;
pub mod config;
pub mod metrics;
pub mod proxy;
pub mod recording;
pub mod response;
