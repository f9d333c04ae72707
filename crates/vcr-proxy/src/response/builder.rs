use crate::proxy::headers::extend_from_multimap;
use crate::recording::RecordedResponse;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::fmt::Display;

/// Body type for every response this crate writes: always fully buffered.
pub type ProxyBody = Full<Bytes>;

/// Serialize `body` as JSON with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<ProxyBody> {
    let json = serde_json::to_vec_pretty(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut response = Response::new(Full::new(Bytes::from(json)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Structured error body: `{"error": "<message>"}`
pub fn error_response(status: StatusCode, message: &str) -> Response<ProxyBody> {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// Write a recorded response back verbatim: status, every header value, body.
pub fn replay_response(recorded: &RecordedResponse) -> Response<ProxyBody> {
    let mut response = Response::new(Full::new(Bytes::copy_from_slice(recorded.body_bytes())));
    *response.status_mut() =
        StatusCode::from_u16(recorded.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    extend_from_multimap(response.headers_mut(), &recorded.headers);
    response
}

/// Buffer a whole request body into memory
pub async fn collect_body<B>(body: B) -> Result<Bytes, String>
where
    B: Body,
    B::Error: Display,
{
    body.collect()
        .await
        .map(|c| c.to_bytes())
        .map_err(|e| format!("Failed to read request body: {e}"))
}
