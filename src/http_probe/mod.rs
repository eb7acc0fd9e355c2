pub mod probe;
pub mod request;
pub mod result;
pub mod validate;

pub mod prelude {
    pub use super::probe::{ProbeError, ProbeExecutor};
    pub use super::request::ProbeRequest;
    pub use super::result::{ProbeOutcome, ValidatedResult};
    pub use super::validate::validate;
}

use std::fmt::Write;

/// Render an error and its whole `source()` chain on a single line, so the
/// root cause (refused connection, DNS failure, certificate problem) ends up
/// in the reported reason instead of only reqwest's outer message.
pub(crate) fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let cause = src.to_string();
        if !s.ends_with(&cause) {
            let _ = write!(s, ": {}", cause);
        }
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_report_includes_causes() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(report(&err), "outer: connection refused");
    }
}
