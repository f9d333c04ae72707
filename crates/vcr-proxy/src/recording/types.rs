//! Types for recorded interactions - request/response snapshots and fingerprints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Header multimap: name -> every value seen for that name.
pub type HeaderMultiMap = BTreeMap<String, Vec<String>>;

/// Recorded request, the matching half of an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    /// Full resolved target URL (never the proxy's own inbound path)
    pub url: String,
    #[serde(default)]
    pub headers: HeaderMultiMap,
    #[serde(default, with = "body_encoding")]
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    pub fn new(
        method: &str,
        url: impl Into<String>,
        headers: HeaderMultiMap,
        body: impl AsRef<[u8]>,
    ) -> Self {
        Self {
            method: method.to_string(),
            url: url.into(),
            headers,
            body: non_empty(body.as_ref()),
        }
    }

    /// SHA-256 over method, URL and body, hex encoded.
    ///
    /// Headers never participate: clients add their own Accept, User-Agent
    /// and Accept-Encoding values and recordings must survive a client swap.
    pub fn fingerprint(&self) -> String {
        fingerprint(
            &self.method,
            &self.url,
            self.body.as_deref().unwrap_or_default(),
        )
    }
}

/// Recorded response, replayed verbatim in playback mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: HeaderMultiMap,
    #[serde(default, with = "body_encoding")]
    pub body: Option<Vec<u8>>,
}

impl RecordedResponse {
    pub fn new(status_code: u16, headers: HeaderMultiMap, body: impl AsRef<[u8]>) -> Self {
        Self {
            status_code,
            headers,
            body: non_empty(body.as_ref()),
        }
    }

    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Where the exchange went and how long the forward took
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionMetadata {
    pub target: String,
    pub duration_ms: u64,
}

/// One persisted request/response pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub request: RecordedRequest,
    pub response: RecordedResponse,
    pub metadata: InteractionMetadata,
}

impl Interaction {
    /// Create an interaction with a fresh id and the current time
    pub fn new(
        request: RecordedRequest,
        response: RecordedResponse,
        target: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            request,
            response,
            metadata: InteractionMetadata {
                target: target.into(),
                duration_ms,
            },
        }
    }

    pub fn fingerprint(&self) -> String {
        self.request.fingerprint()
    }
}

/// Compute the playback key for a request.
pub fn fingerprint(method: &str, url: &str, body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(url.as_bytes());
    hasher.update(body);
    hex::encode(hasher.finalize())
}

fn non_empty(body: &[u8]) -> Option<Vec<u8>> {
    if body.is_empty() {
        None
    } else {
        Some(body.to_vec())
    }
}

/// Bodies are stored as base64 strings, `null` when absent.
mod body_encoding {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        body: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match body {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        match encoded {
            Some(s) if !s.is_empty() => STANDARD
                .decode(s.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
