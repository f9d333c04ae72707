//! Conversions between `HeaderMap` and the recorded header multimap.

use crate::recording::HeaderMultiMap;
use hyper::header::{HeaderName, HeaderValue};
use hyper::HeaderMap;
use tracing::debug;

/// Headers never copied onto an outbound request.
///
/// `host` must name the real target and the framing headers no longer
/// describe the body once it has been buffered.
const OUTBOUND_SKIP: &[&str] = &["host", "content-length", "transfer-encoding", "connection"];

pub fn is_outbound_skipped(name: &str) -> bool {
    OUTBOUND_SKIP
        .iter()
        .any(|skip| name.eq_ignore_ascii_case(skip))
}

/// Snapshot a header map, keeping every value of multi-valued headers
pub fn to_multimap(headers: &HeaderMap) -> HeaderMultiMap {
    let mut map = HeaderMultiMap::new();
    for (name, value) in headers.iter() {
        let value = match value.to_str() {
            Ok(v) => v.to_string(),
            Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };
        map.entry(name.as_str().to_string())
            .or_default()
            .push(value);
    }
    map
}

/// Append recorded headers onto a header map, skipping any that no longer parse
pub fn extend_from_multimap(target: &mut HeaderMap, headers: &HeaderMultiMap) {
    for (name, values) in headers {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            debug!("Skipping invalid recorded header name: {}", name);
            continue;
        };
        for value in values {
            match HeaderValue::from_str(value) {
                Ok(header_value) => {
                    target.append(header_name.clone(), header_value);
                }
                Err(_) => debug!("Skipping invalid value for header {}", name),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_multimap_keeps_all_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let map = to_multimap(&headers);
        assert_eq!(map["set-cookie"], vec!["a=1", "b=2"]);
        assert_eq!(map["content-type"], vec!["text/plain"]);
    }

    #[test]
    fn test_extend_round_trips_multivalued() {
        let mut recorded = HeaderMultiMap::new();
        recorded.insert(
            "Set-Cookie".to_string(),
            vec!["a=1".to_string(), "b=2".to_string()],
        );
        recorded.insert("X-Trace".to_string(), vec!["abc".to_string()]);

        let mut headers = HeaderMap::new();
        extend_from_multimap(&mut headers, &recorded);

        let cookies: Vec<_> = headers.get_all("set-cookie").iter().collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_extend_skips_invalid_entries() {
        let mut recorded = HeaderMultiMap::new();
        recorded.insert("bad header".to_string(), vec!["x".to_string()]);
        recorded.insert("x-ok".to_string(), vec!["line\nbreak".to_string(), "fine".to_string()]);

        let mut headers = HeaderMap::new();
        extend_from_multimap(&mut headers, &recorded);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-ok").unwrap(), "fine");
    }

    #[test]
    fn test_outbound_skip_is_case_insensitive() {
        assert!(is_outbound_skipped("Host"));
        assert!(is_outbound_skipped("content-length"));
        assert!(is_outbound_skipped("Transfer-Encoding"));
        assert!(!is_outbound_skipped("x-tenant"));
        assert!(!is_outbound_skipped("accept"));
    }
}
