use serde::{Serialize, Serializer};

/// What a single request attempt produced.
///
/// When `available` is false the attempt never reached a response, so
/// status, body and timing are all absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    #[serde(rename = "Reason")]
    pub reason: String,

    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Whole milliseconds between sending the request and reading the last body byte.
    #[serde(rename = "TimeTaken", skip_serializing_if = "Option::is_none")]
    pub time_taken_ms: Option<u64>,

    #[serde(rename = "Available", serialize_with = "as_flag")]
    pub available: bool,

    #[serde(rename = "ResponseBody", skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl ProbeOutcome {
    pub fn reachable(reason: String, status_code: u16, response_body: String, time_taken_ms: u64) -> Self {
        Self {
            reason,
            status_code: Some(status_code),
            time_taken_ms: Some(time_taken_ms),
            available: true,
            response_body: Some(response_body),
        }
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = "request failed".to_string();
        }
        Self {
            reason,
            status_code: None,
            time_taken_ms: None,
            available: false,
            response_body: None,
        }
    }
}

/// A [`ProbeOutcome`] after the optional match rules ran.
///
/// Serializes to the result returned to the caller: `Reason`, `StatusCode`,
/// `TimeTaken`, `Available` and, when present, `ResponseBody`,
/// `ResponseBodyRegexMatch` and `StatusCodeMatch`. Booleans are written as 0/1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedResult {
    #[serde(flatten)]
    pub outcome: ProbeOutcome,

    #[serde(
        rename = "ResponseBodyRegexMatch",
        skip_serializing_if = "Option::is_none",
        serialize_with = "as_optional_flag"
    )]
    pub body_match: Option<bool>,

    #[serde(
        rename = "StatusCodeMatch",
        skip_serializing_if = "Option::is_none",
        serialize_with = "as_optional_flag"
    )]
    pub status_match: Option<bool>,
}

impl ValidatedResult {
    pub fn available(&self) -> bool {
        self.outcome.available
    }

    /// Drop the response body, keeping every other field.
    pub fn without_body(mut self) -> Self {
        self.outcome.response_body = None;
        self
    }
}

impl From<ProbeOutcome> for ValidatedResult {
    fn from(outcome: ProbeOutcome) -> Self {
        Self {
            outcome,
            body_match: None,
            status_match: None,
        }
    }
}

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

fn as_optional_flag<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => as_flag(v, serializer),
        None => serializer.serialize_none(),
    }
}
