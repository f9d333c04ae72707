//! Resolution of the `target` query parameter.

use super::error::ProxyError;
use hyper::Uri;

const TARGET_PARAM: &str = "target";

/// The real upstream a proxied request is forwarded to or matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Absolute URL; this exact string is what gets fingerprinted
    pub url: String,
    /// `host[:port]`, used for metadata and the storage directory
    pub host: String,
}

impl Target {
    /// Read `target` from a raw query string.
    pub fn from_query(query: Option<&str>) -> Result<Self, ProxyError> {
        let raw = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .find_map(|pair| match pair.split_once('=') {
                Some((TARGET_PARAM, value)) => Some(value),
                _ => None,
            })
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ProxyError::BadRequest("Missing 'target' query parameter".to_string())
            })?;

        // Percent escapes only; `+` is passed through to the target's query
        let decoded = urlencoding::decode(raw).map_err(|_| {
            ProxyError::BadRequest(format!("Invalid target '{raw}': not valid UTF-8"))
        })?;
        Self::parse(&decoded)
    }

    /// Resolve a target value. A value without a scheme is taken as `http://`.
    pub fn parse(value: &str) -> Result<Self, ProxyError> {
        let value = value.trim();
        let url = if value.contains("://") {
            value.to_string()
        } else {
            format!("http://{value}")
        };

        let uri: Uri = url
            .parse()
            .map_err(|e| ProxyError::BadRequest(format!("Invalid target URL '{value}': {e}")))?;

        match uri.scheme_str() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(ProxyError::BadRequest(format!(
                    "Invalid target URL '{value}': scheme must be http or https"
                )))
            }
        }

        let host = match uri.host() {
            Some(h) if !h.is_empty() => h,
            _ => {
                return Err(ProxyError::BadRequest(format!(
                    "Invalid target URL '{value}': missing host"
                )))
            }
        };
        let host = match uri.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self { url, host })
    }
}
