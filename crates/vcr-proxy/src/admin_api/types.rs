//! Request and response bodies for the Admin API.

use crate::recording::{HistoryEntry, Interaction, Mode, StatsSnapshot};
use serde::{Deserialize, Serialize};

/// Body accepted by `POST|PUT /api/mode`
#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModeResponse {
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous: Option<Mode>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counters: StatsSnapshot,
    pub mode: Mode,
    pub recordings: usize,
    pub history_size: usize,
    pub uptime_secs: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct RecordingsResponse {
    pub count: usize,
    pub recordings: Vec<Interaction>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

/// Value of the first `name=` pair in a raw query string, percent-decoded
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        assert_eq!(
            query_param(Some("limit=10&mode=playback"), "mode").as_deref(),
            Some("playback")
        );
        assert_eq!(query_param(Some("limit=10"), "limit").as_deref(), Some("10"));
        assert_eq!(query_param(Some("limits=10"), "limit"), None);
        assert_eq!(query_param(Some("flag"), "flag"), None);
        assert_eq!(query_param(None, "limit"), None);
        assert_eq!(
            query_param(Some("mode=play%62ack"), "mode").as_deref(),
            Some("playback")
        );
    }

    #[test]
    fn test_mode_response_omits_missing_previous() {
        let json = serde_json::to_value(ModeResponse {
            mode: Mode::Record,
            previous: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "record" }));
    }
}
