use std::io::Read;
use std::time::Duration;

use regex::Regex;
use reqwest::Method;
use url::Url;

use super::headers::parse_headers;
use super::model::*;
use super::{CheckConfig, ClientOptions, ConfigError, MimirOptions, ReportOptions};
use crate::http_probe::request::ProbeRequest;

pub const DEFAULT_ENDPOINT: &str = "https://google.com.au";
pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
pub const DEFAULT_NAMESPACE: &str = "HttpCheck";
pub const DEFAULT_MIMIR_ENDPOINT: &str = "http://localhost:9009";

/// The lowest-precedence tier: values used when neither the event nor the
/// environment sets a key.
pub fn defaults() -> RawSettings {
    RawSettings {
        endpoint: Some(DEFAULT_ENDPOINT.to_string()),
        method: Some(DEFAULT_METHOD.to_string()),
        payload: None,
        timeout: Some(DEFAULT_TIMEOUT_SECONDS.to_string()),
        headers: Some(String::new()),
        report_response_body: Some("0".to_string()),
        report_as_metrics: Some("1".to_string()),
        metrics_namespace: Some(DEFAULT_NAMESPACE.to_string()),
        body_regex_match: None,
        status_code_match: None,
        fail_on_status_code_mismatch: Some("0".to_string()),
        http_debug: Some("0".to_string()),
        accept_invalid_certs: Some("0".to_string()),
        mimir_endpoint: Some(DEFAULT_MIMIR_ENDPOINT.to_string()),
        mimir_tenant_id: None,
    }
}

/// Load the check configuration for one invocation.
///
/// The event document is read from `event_source` (a file path, or `-` for
/// stdin). Without one the event tier is empty. Environment variables come
/// next, then the built-in defaults.
pub fn load_config(event_source: Option<&str>) -> Result<CheckConfig, ConfigError> {
    let document = match event_source {
        None => String::new(),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| ConfigError::EventRead {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            buf
        }
        Some(path) => std::fs::read_to_string(path).map_err(|source| ConfigError::EventRead {
            path: path.to_string(),
            source,
        })?,
    };

    let event = RawSettings::from_event_str(&document)?;
    resolve(event, RawSettings::from_env())
}

/// Layer `event` over `env` over [`defaults`], then validate every value.
pub fn resolve(event: RawSettings, env: RawSettings) -> Result<CheckConfig, ConfigError> {
    let raw = event.or(env).or(defaults());

    let endpoint_label = raw
        .endpoint
        .as_deref()
        .unwrap_or(DEFAULT_ENDPOINT)
        .trim()
        .to_string();
    let endpoint = parse_endpoint(&endpoint_label)?;
    let method = parse_method(raw.method.as_deref().unwrap_or(DEFAULT_METHOD))?;
    let timeout = parse_timeout(raw.timeout.as_deref())?;
    let headers = parse_headers(raw.headers.as_deref().unwrap_or_default())?;

    let body_pattern = non_blank(raw.body_regex_match.as_deref())
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                key: BODY_REGEX_MATCH,
                source,
            })
        })
        .transpose()?;
    let expected_status = non_blank(raw.status_code_match.as_deref())
        .map(parse_status)
        .transpose()?;

    let request = ProbeRequest {
        endpoint,
        method,
        payload: raw.payload.map(String::into_bytes),
        headers,
        timeout,
        body_pattern,
        expected_status,
        fail_on_status_mismatch: parse_flag(
            FAIL_ON_STATUS_CODE_MISMATCH,
            raw.fail_on_status_code_mismatch.as_deref(),
        )?,
    };

    let report = ReportOptions {
        enabled: parse_flag(REPORT_AS_METRICS, raw.report_as_metrics.as_deref())?,
        namespace: raw
            .metrics_namespace
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        include_body: parse_flag(REPORT_RESPONSE_BODY, raw.report_response_body.as_deref())?,
        endpoint_label,
    };

    let client = ClientOptions {
        accept_invalid_certs: parse_flag(ACCEPT_INVALID_CERTS, raw.accept_invalid_certs.as_deref())?,
        http_debug: parse_flag(HTTP_DEBUG, raw.http_debug.as_deref())?,
    };

    let mimir = MimirOptions {
        endpoint: raw
            .mimir_endpoint
            .unwrap_or_else(|| DEFAULT_MIMIR_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string(),
        tenant_id: non_blank(raw.mimir_tenant_id.as_deref()).map(str::to_string),
    };

    Ok(CheckConfig {
        request,
        report,
        client,
        mimir,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        key: ENDPOINT,
        value: value.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            key: ENDPOINT,
            scheme: other.to_string(),
        }),
    }
}

fn parse_method(value: &str) -> Result<Method, ConfigError> {
    let upper = value.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(ConfigError::InvalidMethod {
            key: METHOD,
            value: value.to_string(),
        });
    }
    Method::from_bytes(upper.as_bytes()).map_err(|_| ConfigError::InvalidMethod {
        key: METHOD,
        value: value.to_string(),
    })
}

fn parse_timeout(value: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
    };
    let invalid = || ConfigError::InvalidTimeout {
        key: TIMEOUT,
        value: value.to_string(),
    };

    let seconds: f64 = value.trim().parse().map_err(|_| invalid())?;
    if seconds <= 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}

fn parse_status(value: &str) -> Result<u16, ConfigError> {
    value
        .parse::<u16>()
        .ok()
        .filter(|code| (100..=999).contains(code))
        .ok_or_else(|| ConfigError::InvalidStatus {
            key: STATUS_CODE_MATCH,
            value: value.to_string(),
        })
}

fn parse_flag(key: &'static str, value: Option<&str>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
