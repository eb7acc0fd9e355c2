use std::time::Duration;

use regex::Regex;
use reqwest::Method;
use reqwest::header::HeaderMap;
use url::Url;

/// A single HTTP(S) request to issue, plus the rules its response is judged by.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Always `http` or `https`.
    pub endpoint: Url,
    pub method: Method,
    pub payload: Option<Vec<u8>>,
    pub headers: HeaderMap,
    /// Applied to the whole exchange: connect, send and reading the body.
    pub timeout: Duration,
    /// Searched for anywhere in the response body.
    pub body_pattern: Option<Regex>,
    pub expected_status: Option<u16>,
    /// Report the endpoint as unavailable when the status does not match.
    pub fail_on_status_mismatch: bool,
}

impl ProbeRequest {
    /// The endpoint as an origin-form request target, e.g. `/health?full=1`.
    pub fn request_target(&self) -> String {
        request_target(&self.endpoint)
    }
}

/// Origin-form target for `url`: an empty path becomes `/` and a present
/// query string is appended after `?`.
pub fn request_target(url: &Url) -> String {
    let mut target = match url.path() {
        "" => "/".to_string(),
        path => path.to_string(),
    };
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    target
}
