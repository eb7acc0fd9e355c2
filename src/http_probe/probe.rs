use std::time::{Duration, Instant};

use hyper::ext::ReasonPhrase;
use reqwest::{Client, redirect};
use thiserror::Error;

use super::prelude::*;
use super::report;
use crate::config::ClientOptions;

const USER_AGENT: &str = concat!("httpcheck/", env!("CARGO_PKG_VERSION"));

/// Why a request attempt did not produce a response.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl ProbeError {
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(timeout)
        } else if err.is_connect() {
            ProbeError::Connect(report(&err))
        } else if err.is_body() || err.is_decode() {
            ProbeError::Body(report(&err))
        } else {
            ProbeError::Request(report(&err))
        }
    }
}

/// Issues exactly one request per [`ProbeExecutor::execute`] call.
///
/// Redirects are not followed: the status of the first response is the one
/// that gets reported.
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    client: Client,
    http_debug: bool,
}

impl ProbeExecutor {
    pub fn new(options: &ClientOptions) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProbeError::Client(report(&e)))?;

        if options.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for probes");
        }

        Ok(Self {
            client,
            http_debug: options.http_debug,
        })
    }

    /// Run the request and classify the attempt. Never fails: connection,
    /// DNS, TLS and timeout errors come back as an unavailable outcome.
    pub async fn execute(&self, request: &ProbeRequest) -> ProbeOutcome {
        match self.send(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(endpoint = %request.endpoint, error = %e, "Failed to connect");
                ProbeOutcome::unreachable(e.to_string())
            }
        }
    }

    async fn send(&self, request: &ProbeRequest) -> Result<ProbeOutcome, ProbeError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.endpoint.clone())
            .headers(request.headers.clone())
            .timeout(request.timeout);
        if let Some(payload) = &request.payload {
            builder = builder.body(payload.clone());
        }

        if self.http_debug {
            tracing::info!(
                method = %request.method,
                host = request.endpoint.host_str().unwrap_or_default(),
                target = %request.request_target(),
                headers = ?request.headers,
                payload_bytes = request.payload.as_ref().map_or(0, Vec::len),
                "Sending probe request"
            );
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, request.timeout))?;

        let status = response.status();
        let version = response.version();
        let reason = reason_phrase(&response);
        let headers = self.http_debug.then(|| response.headers().clone());

        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, request.timeout))?;
        let elapsed = start.elapsed();

        if let Some(headers) = headers {
            tracing::info!(
                status = status.as_u16(),
                version = ?version,
                headers = ?headers,
                body_bytes = body.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Received probe response"
            );
        }

        Ok(ProbeOutcome::reachable(
            reason,
            status.as_u16(),
            body,
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        ))
    }
}

/// The reason phrase the server actually sent. hyper only keeps it when it
/// differs from the canonical one, and HTTP/2 has none at all, so fall back to
/// the canonical phrase and finally to the numeric code.
fn reason_phrase(response: &reqwest::Response) -> String {
    if let Some(phrase) = response.extensions().get::<ReasonPhrase>() {
        let phrase = String::from_utf8_lossy(phrase.as_bytes()).trim().to_string();
        if !phrase.is_empty() {
            return phrase;
        }
    }
    let status = response.status();
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
