pub mod sink;

pub use sink::{MetricsSink, SinkAck, SinkError};

use crate::http_probe::result::ValidatedResult;

pub const ENDPOINT_DIMENSION: &str = "Endpoint";
pub const AVAILABLE_METRIC: &str = "Available";
pub const TIME_TAKEN_METRIC: &str = "TimeTaken";
pub const STATUS_CODE_METRIC: &str = "StatusCode";
pub const BODY_MATCH_METRIC: &str = "ResponseBodyRegexMatch";
pub const STATUS_MATCH_METRIC: &str = "StatusCodeMatch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    None,
    Milliseconds,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::None => "None",
            Unit::Milliseconds => "Milliseconds",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// One named, dimensioned observation.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub name: &'static str,
    pub dimensions: Vec<Dimension>,
    pub unit: Unit,
    pub value: f64,
}

fn record(name: &'static str, endpoint: &str, unit: Unit, value: f64) -> MetricRecord {
    MetricRecord {
        name,
        dimensions: vec![Dimension {
            name: ENDPOINT_DIMENSION.to_string(),
            value: endpoint.to_string(),
        }],
        unit,
        value,
    }
}

fn flag(value: bool) -> f64 {
    match value {
        true => 1.0,
        false => 0.0,
    }
}

/// Creates the metric records for a finished check, in a fixed order:
///    - `Available`: 1 when the endpoint is considered available, always present.
///    - `TimeTaken`: request duration in milliseconds.
///    - `StatusCode`: HTTP status code of the response.
///    - `ResponseBodyRegexMatch`: 1 when the body pattern matched.
///    - `StatusCodeMatch`: 1 when the status equals the expected one.
///
/// Everything after `Available` is only emitted for an available result, and
/// the match records only when their rule was configured. Every record
/// carries a single `Endpoint` dimension holding `endpoint` verbatim.
pub fn build_metrics(result: &ValidatedResult, endpoint: &str) -> Vec<MetricRecord> {
    let mut metrics = vec![record(AVAILABLE_METRIC, endpoint, Unit::None, flag(result.available()))];

    if !result.available() {
        return metrics;
    }

    if let Some(time_taken) = result.outcome.time_taken_ms {
        metrics.push(record(
            TIME_TAKEN_METRIC,
            endpoint,
            Unit::Milliseconds,
            time_taken as f64,
        ));
    }
    if let Some(status_code) = result.outcome.status_code {
        metrics.push(record(STATUS_CODE_METRIC, endpoint, Unit::None, status_code as f64));
    }
    if let Some(body_match) = result.body_match {
        metrics.push(record(BODY_MATCH_METRIC, endpoint, Unit::None, flag(body_match)));
    }
    if let Some(status_match) = result.status_match {
        metrics.push(record(STATUS_MATCH_METRIC, endpoint, Unit::None, flag(status_match)));
    }

    metrics
}

/// Push `records` to `sink`. Failures are logged and swallowed; the caller's
/// result does not depend on whether reporting worked.
pub async fn report(sink: &dyn MetricsSink, namespace: &str, records: &[MetricRecord]) -> Option<SinkAck> {
    if records.is_empty() {
        tracing::warn!("No metrics to send.");
        return None;
    }

    match sink.put_metrics(namespace, records).await {
        Ok(ack) => {
            tracing::info!(
                namespace,
                count = records.len(),
                request_id = ack.request_id.as_deref().unwrap_or("-"),
                "Sent metrics"
            );
            Some(ack)
        }
        Err(e) => {
            tracing::error!(namespace, error = %e, "Failed to publish metrics");
            None
        }
    }
}
