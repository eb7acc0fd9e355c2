use async_trait::async_trait;
use thiserror::Error;

use super::MetricRecord;

/// Acknowledgment returned by a sink after an accepted push.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SinkAck {
    /// Backend request id, when the backend hands one out.
    pub request_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode metrics: {0}")]
    Encode(String),

    #[error("failed to send metrics: {0}")]
    Transport(String),

    #[error("metrics rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A push API for metric records.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn put_metrics(&self, namespace: &str, records: &[MetricRecord]) -> Result<SinkAck, SinkError>;
}
