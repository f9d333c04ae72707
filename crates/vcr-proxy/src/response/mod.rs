//! HTTP response builders shared by the proxy and admin listeners.

mod builder;

pub use builder::{collect_body, error_response, json_response, replay_response, ProxyBody};
