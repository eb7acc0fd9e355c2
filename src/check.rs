use crate::config::CheckConfig;
use crate::http_probe::prelude::*;
use crate::metrics::{self, MetricsSink};

/// Run one health check end to end.
///
/// The probe result is computed before anything is reported, and nothing the
/// sink does can change it. `sink` is only used when reporting is enabled.
/// The response body is dropped from the returned result unless
/// `include_body` is set; it is still used for the body pattern check.
pub async fn run_check(
    config: &CheckConfig,
    executor: &ProbeExecutor,
    sink: Option<&dyn MetricsSink>,
) -> ValidatedResult {
    let request = &config.request;

    let outcome = executor.execute(request).await;
    let result = validate(
        outcome,
        request.body_pattern.as_ref(),
        request.expected_status,
        request.fail_on_status_mismatch,
    );

    match (config.report.enabled, sink) {
        (true, Some(sink)) => {
            let records = metrics::build_metrics(&result, &config.report.endpoint_label);
            metrics::report(sink, &config.report.namespace, &records).await;
        }
        (true, None) => tracing::warn!("Metric reporting enabled but no sink configured"),
        (false, _) => tracing::debug!("Metric reporting disabled"),
    }

    let result = match config.report.include_body {
        true => result,
        false => result.without_body(),
    };

    tracing::info!(
        method = %request.method,
        endpoint = %config.report.endpoint_label,
        available = result.available(),
        status = ?result.outcome.status_code,
        time_taken_ms = ?result.outcome.time_taken_ms,
        reason = %result.outcome.reason,
        "Check finished"
    );

    result
}
