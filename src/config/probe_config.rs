use crate::http_probe::request::ProbeRequest;

/// Fully resolved and validated configuration for a single check.
/// Built once by [`crate::config::resolve`]; the pipeline never looks at
/// event or environment state itself.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// The request to issue together with its match rules.
    pub request: ProbeRequest,

    /// What to do with the result once it is known.
    pub report: ReportOptions,

    /// How the HTTP client is built.
    pub client: ClientOptions,

    /// Where metrics are pushed when reporting is enabled.
    pub mimir: MimirOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Push metric records to the sink.
    pub enabled: bool,

    /// Metric namespace, prefixed to every metric name.
    pub namespace: String,

    /// Keep `ResponseBody` in the returned result.
    pub include_body: bool,

    /// The endpoint exactly as configured, used as the `Endpoint` dimension.
    pub endpoint_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientOptions {
    /// Skip TLS certificate and hostname verification.
    /// Lets probes succeed against self-signed or misconfigured hosts.
    pub accept_invalid_certs: bool,

    /// Log request and response details for every probe.
    pub http_debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimirOptions {
    /// Base URL of the Mimir instance, e.g. `http://localhost:9009`.
    pub endpoint: String,

    /// Sent as `X-Scope-OrgID` for multi-tenant setups.
    pub tenant_id: Option<String>,
}
