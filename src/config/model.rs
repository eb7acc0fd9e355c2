use serde::{Deserialize, Deserializer};

pub const ENDPOINT: &str = "ENDPOINT";
pub const METHOD: &str = "METHOD";
pub const PAYLOAD: &str = "PAYLOAD";
pub const TIMEOUT: &str = "TIMEOUT";
pub const HEADERS: &str = "HEADERS";
pub const REPORT_RESPONSE_BODY: &str = "REPORT_RESPONSE_BODY";
pub const REPORT_AS_METRICS: &str = "REPORT_AS_METRICS";
pub const METRICS_NAMESPACE: &str = "METRICS_NAMESPACE";
pub const BODY_REGEX_MATCH: &str = "BODY_REGEX_MATCH";
pub const STATUS_CODE_MATCH: &str = "STATUS_CODE_MATCH";
pub const FAIL_ON_STATUS_CODE_MISMATCH: &str = "FAIL_ON_STATUS_CODE_MISMATCH";
pub const HTTP_DEBUG: &str = "HTTP_DEBUG";
pub const ACCEPT_INVALID_CERTS: &str = "ACCEPT_INVALID_CERTS";
pub const MIMIR_ENDPOINT: &str = "MIMIR_ENDPOINT";
pub const MIMIR_TENANT_ID: &str = "MIMIR_TENANT_ID";

/// One tier of unresolved check settings.
///
/// The same shape is filled from the invocation event and from the process
/// environment; [`RawSettings::or`] layers two tiers on top of each other.
/// Values stay as strings until [`crate::config::resolve`] validates them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawSettings {
    #[serde(default, deserialize_with = "lenient_string")]
    pub endpoint: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payload: Option<String>,
    /// Seconds, fractional values allowed.
    #[serde(default, deserialize_with = "lenient_string")]
    pub timeout: Option<String>,
    /// Space separated `key=value` pairs.
    #[serde(default, deserialize_with = "lenient_string")]
    pub headers: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub report_response_body: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub report_as_metrics: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub metrics_namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub body_regex_match: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_code_match: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fail_on_status_code_mismatch: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub http_debug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub accept_invalid_certs: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mimir_endpoint: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mimir_tenant_id: Option<String>,
}

impl RawSettings {
    /// Parse an event document. JSON is accepted as well since it is a YAML subset.
    pub fn from_event_str(document: &str) -> Result<Self, serde_yaml::Error> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(document)
    }

    /// Build the environment tier from `lookup`, usually `std::env::var(key).ok()`.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            endpoint: lookup(ENDPOINT),
            method: lookup(METHOD),
            payload: lookup(PAYLOAD),
            timeout: lookup(TIMEOUT),
            headers: lookup(HEADERS),
            report_response_body: lookup(REPORT_RESPONSE_BODY),
            report_as_metrics: lookup(REPORT_AS_METRICS),
            metrics_namespace: lookup(METRICS_NAMESPACE),
            body_regex_match: lookup(BODY_REGEX_MATCH),
            status_code_match: lookup(STATUS_CODE_MATCH),
            fail_on_status_code_mismatch: lookup(FAIL_ON_STATUS_CODE_MISMATCH),
            http_debug: lookup(HTTP_DEBUG),
            accept_invalid_certs: lookup(ACCEPT_INVALID_CERTS),
            mimir_endpoint: lookup(MIMIR_ENDPOINT),
            mimir_tenant_id: lookup(MIMIR_TENANT_ID),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Field-wise merge where `self` wins and `fallback` fills the gaps.
    pub fn or(self, fallback: RawSettings) -> RawSettings {
        RawSettings {
            endpoint: self.endpoint.or(fallback.endpoint),
            method: self.method.or(fallback.method),
            payload: self.payload.or(fallback.payload),
            timeout: self.timeout.or(fallback.timeout),
            headers: self.headers.or(fallback.headers),
            report_response_body: self.report_response_body.or(fallback.report_response_body),
            report_as_metrics: self.report_as_metrics.or(fallback.report_as_metrics),
            metrics_namespace: self.metrics_namespace.or(fallback.metrics_namespace),
            body_regex_match: self.body_regex_match.or(fallback.body_regex_match),
            status_code_match: self.status_code_match.or(fallback.status_code_match),
            fail_on_status_code_mismatch: self
                .fail_on_status_code_mismatch
                .or(fallback.fail_on_status_code_mismatch),
            http_debug: self.http_debug.or(fallback.http_debug),
            accept_invalid_certs: self.accept_invalid_certs.or(fallback.accept_invalid_certs),
            mimir_endpoint: self.mimir_endpoint.or(fallback.mimir_endpoint),
            mimir_tenant_id: self.mimir_tenant_id.or(fallback.mimir_tenant_id),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

// Events written by hand tend to carry `TIMEOUT: 30` or `REPORT_RESPONSE_BODY: true`
// rather than quoted strings.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Text(s) => s,
    }))
}
