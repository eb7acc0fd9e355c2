use std::time::Duration;

use async_trait::async_trait;
use prompb::TimeSeries;
use reqwest::Client;

use crate::config::MimirOptions;
use crate::metrics::{MetricRecord, MetricsSink, SinkAck, SinkError, Unit};

pub mod client;
pub mod prompb;

const UNIT_LABEL: &str = "unit";
const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Pushes metric records to Mimir through the Prometheus remote write API.
///
/// Each record becomes one series named `<namespace>_<metric>`, labelled with
/// the record's dimensions and, for anything but [`Unit::None`], a `unit` label.
#[derive(Debug, Clone)]
pub struct MimirSink {
    client: Client,
    endpoint: String,
    tenant_id: Option<String>,
}

impl MimirSink {
    pub fn new(options: &MimirOptions) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(PUSH_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: options.endpoint.clone(),
            tenant_id: options.tenant_id.clone(),
        })
    }
}

#[async_trait]
impl MetricsSink for MimirSink {
    async fn put_metrics(&self, namespace: &str, records: &[MetricRecord]) -> Result<SinkAck, SinkError> {
        let series = create_record_series(namespace, records);
        tracing::debug!(endpoint = %self.endpoint, series = series.len(), "Pushing to Mimir");
        client::send_to_mimir(&self.client, &self.endpoint, self.tenant_id.as_deref(), series).await
    }
}

/// Converts metric records into remote-write series, one sample each, all
/// sharing the same timestamp.
pub fn create_record_series(namespace: &str, records: &[MetricRecord]) -> Vec<TimeSeries> {
    let timestamp = chrono::Utc::now().timestamp_millis();

    records
        .iter()
        .map(|record| {
            let metric_name = metric_name(namespace, record.name);
            let label_names: Vec<String> = record.dimensions.iter().map(|d| label_name(&d.name)).collect();

            let mut labels: Vec<(&str, &str)> = label_names
                .iter()
                .zip(&record.dimensions)
                .map(|(name, dimension)| (name.as_str(), dimension.value.as_str()))
                .collect();
            if record.unit != Unit::None {
                labels.push((UNIT_LABEL, record.unit.as_str()));
            }

            client::create_time_series(&metric_name, &labels, record.value, Some(timestamp))
        })
        .collect()
}

fn metric_name(namespace: &str, name: &str) -> String {
    let raw = match namespace.is_empty() {
        true => name.to_string(),
        false => format!("{namespace}_{name}"),
    };
    let sanitized: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == ':' { c } else { '_' })
        .collect();
    match sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        true => format!("_{sanitized}"),
        false => sanitized,
    }
}

fn label_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match sanitized.starts_with(|c: char| c.is_ascii_digit()) || sanitized.is_empty() {
        true => format!("_{sanitized}"),
        false => sanitized,
    }
}
