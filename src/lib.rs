//! Single-shot HTTP(S) health check.
//!
//! One invocation resolves a [`config::CheckConfig`], issues one request,
//! applies the optional match rules, pushes the outcome as metrics and
//! returns the result:
//!
//! ```text
//! config → http_probe::probe → http_probe::validate → metrics → (sink, caller)
//! ```

pub mod check;
pub mod config;
pub mod http_probe;
pub mod metrics;
pub mod mimir;

#[cfg(test)]
mod test_support;

pub use check::run_check;
