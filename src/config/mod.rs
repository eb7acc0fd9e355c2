pub mod app_config;
pub mod headers;
pub mod model;
pub mod probe_config;

pub use app_config::{load_config, resolve};
pub use model::RawSettings;
pub use probe_config::{CheckConfig, ClientOptions, MimirOptions, ReportOptions};

use thiserror::Error;

/// Errors raised while turning raw settings into a [`CheckConfig`].
///
/// Every variant names the setting key it came from so the caller can point
/// at the offending event field or environment variable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read event document {path}: {source}")]
    EventRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse event document: {0}")]
    EventParse(#[from] serde_yaml::Error),

    #[error("{key}: invalid URL {value:?}: {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{key}: unsupported scheme {scheme:?}, expected http or https")]
    UnsupportedScheme { key: &'static str, scheme: String },

    #[error("{key}: invalid HTTP method {value:?}")]
    InvalidMethod { key: &'static str, value: String },

    #[error("{key}: timeout must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("{key}: malformed header entry {entry:?}, expected key=value")]
    MalformedHeader { key: &'static str, entry: String },

    #[error("{key}: invalid header {name:?}: {reason}")]
    InvalidHeader {
        key: &'static str,
        name: String,
        reason: String,
    },

    #[error("{key}: invalid body pattern: {source}")]
    InvalidPattern {
        key: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("{key}: expected status must be a number between 100 and 999, got {value:?}")]
    InvalidStatus { key: &'static str, value: String },

    #[error("{key}: invalid flag {value:?}, expected 1/0, true/false, yes/no or on/off")]
    InvalidFlag { key: &'static str, value: String },
}
