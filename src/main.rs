use std::process::ExitCode;

use httpcheck::config::load_config;
use httpcheck::http_probe::prelude::*;
use httpcheck::metrics::MetricsSink;
use httpcheck::mimir::MimirSink;
use httpcheck::run_check;
use tracing_subscriber::EnvFilter;

/// Runs a single check and prints the result as JSON.
///
/// Usage: `httpcheck [EVENT_FILE | -]`. The optional event document (YAML or
/// JSON) overrides environment variables, which override the defaults.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let event_source = std::env::args().nth(1);
    let config = match load_config(event_source.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(2);
        }
    };

    let executor = match ProbeExecutor::new(&config.client) {
        Ok(executor) => executor,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up probe");
            return ExitCode::FAILURE;
        }
    };

    let sink = match config.report.enabled {
        true => match MimirSink::new(&config.mimir) {
            Ok(sink) => {
                tracing::info!(endpoint = %config.mimir.endpoint, "Using Mimir endpoint");
                Some(sink)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up Mimir sink, metrics will not be sent");
                None
            }
        },
        false => None,
    };

    let result = run_check(
        &config,
        &executor,
        sink.as_ref().map(|s| s as &dyn MetricsSink),
    )
    .await;

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize result");
            ExitCode::FAILURE
        }
    }
}
