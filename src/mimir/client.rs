use chrono::Utc;
use reqwest::{
    Client,
    header::{CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use snap::raw::Encoder;

use super::prompb::{Label, Sample, TimeSeries, WriteRequest};
use crate::metrics::{SinkAck, SinkError};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sends Prometheus samples to a Mimir remote write endpoint.
///
/// # Arguments
///
/// * `client` - The HTTP client used for the push.
/// * `mimir_endpoint` - The base URL of your Mimir instance (e.g., "http://localhost:9009").
/// * `tenant_id` - An optional tenant ID string for multi-tenant Mimir setups.
/// * `metrics` - The `TimeSeries` to send.
pub async fn send_to_mimir(
    client: &Client,
    mimir_endpoint: &str,
    tenant_id: Option<&str>,
    metrics: Vec<TimeSeries>,
) -> Result<SinkAck, SinkError> {
    let body = encode_write_request(metrics)?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_ENCODING, HeaderValue::from_static("snappy"));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-protobuf"),
    );
    headers.insert(
        "X-Prometheus-Remote-Write-Version",
        HeaderValue::from_static("0.1.0"),
    );
    if let Some(id) = tenant_id {
        let value = HeaderValue::from_str(id).map_err(|e| SinkError::Encode(format!("tenant id: {e}")))?;
        headers.insert("X-Scope-OrgID", value);
    }

    let response = client
        .post(format!("{mimir_endpoint}/api/v1/push")) // Mimir's remote write endpoint
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| SinkError::Transport(crate::http_probe::report(&e)))?;

    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SinkError::Rejected {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    Ok(SinkAck { request_id })
}

/// Protobuf-encode and snappy-compress a write request.
pub fn encode_write_request(metrics: Vec<TimeSeries>) -> Result<Vec<u8>, SinkError> {
    let write_request = WriteRequest {
        timeseries: metrics,
    };

    let mut buf = Vec::new();
    prost::Message::encode(&write_request, &mut buf).map_err(|e| SinkError::Encode(e.to_string()))?;

    let mut encoder = Encoder::new();
    encoder
        .compress_vec(&buf)
        .map_err(|e| SinkError::Encode(e.to_string()))
}

/// Creates a `TimeSeries` with a single sample.
///
/// # Arguments
///
/// * `metric_name` - The name of the metric (e.g., "HttpCheck_Available").
/// * `labels` - Label name/value pairs (e.g., `&[("Endpoint", "https://example.com")]`).
/// * `value` - The sample value.
/// * `timestamp_ms` - An optional timestamp in milliseconds. If not provided, the current time will be used.
///
/// # Returns
///
/// A `TimeSeries` with `__name__` added and labels sorted by name, as remote write requires.
pub fn create_time_series(
    metric_name: &str,
    labels: &[(&str, &str)],
    value: f64,
    timestamp_ms: Option<i64>,
) -> TimeSeries {
    let mut all_labels = Vec::with_capacity(labels.len() + 1);
    all_labels.push(Label {
        name: "__name__".to_string(),
        value: metric_name.to_string(),
    });

    for (name, val) in labels {
        all_labels.push(Label {
            name: name.to_string(),
            value: val.to_string(),
        });
    }
    all_labels.sort_by(|a, b| a.name.cmp(&b.name));

    let sample = Sample {
        value,
        timestamp: timestamp_ms.unwrap_or_else(|| Utc::now().timestamp_millis()),
    };

    TimeSeries {
        labels: all_labels,
        samples: vec![sample],
    }
}
