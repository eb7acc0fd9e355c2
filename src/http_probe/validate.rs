use regex::Regex;

use super::result::{ProbeOutcome, ValidatedResult};

/// Apply the optional match rules to a finished attempt.
///
/// Nothing is checked when the endpoint was not reachable. A status mismatch
/// with `fail_on_mismatch` set is the only rule that changes availability:
/// the endpoint answered, but it is reported as unavailable.
pub fn validate(
    outcome: ProbeOutcome,
    pattern: Option<&Regex>,
    expected_status: Option<u16>,
    fail_on_mismatch: bool,
) -> ValidatedResult {
    let mut result = ValidatedResult::from(outcome);
    if !result.available() {
        return result;
    }

    if let Some(pattern) = pattern {
        let body = result.outcome.response_body.as_deref().unwrap_or_default();
        result.body_match = Some(pattern.is_match(body));
    }

    if let Some(expected) = expected_status {
        let matched = result.outcome.status_code == Some(expected);
        result.status_match = Some(matched);

        if !matched && fail_on_mismatch {
            tracing::warn!(
                expected,
                actual = ?result.outcome.status_code,
                "Status code mismatch, reporting endpoint as unavailable"
            );
            result.outcome.available = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable(status: u16, body: &str) -> ProbeOutcome {
        ProbeOutcome::reachable("reason".to_string(), status, body.to_string(), 5)
    }

    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).expect("valid regex")
    }

    #[test]
    fn test_no_rules_leaves_outcome_untouched() {
        let result = validate(reachable(200, "OK"), None, None, true);
        assert!(result.available());
        assert_eq!(result.body_match, None);
        assert_eq!(result.status_match, None);
    }

    #[test]
    fn test_body_pattern() {
        let ok = regex("^OK");
        let error = regex("ERROR");
        assert_eq!(validate(reachable(200, "OK all good"), Some(&ok), None, false).body_match, Some(true));
        assert_eq!(validate(reachable(200, "OK all good"), Some(&error), None, false).body_match, Some(false));
        assert_eq!(validate(reachable(200, "status: OK"), Some(&ok), None, false).body_match, Some(false));
    }

    #[test]
    fn test_body_pattern_matches_anywhere() {
        let pattern = regex("healthy");
        let result = validate(reachable(200, "{\"state\":\"healthy\"}"), Some(&pattern), None, false);
        assert_eq!(result.body_match, Some(true));
    }

    #[test]
    fn test_body_mismatch_never_changes_availability() {
        let pattern = regex("ERROR");
        let result = validate(reachable(200, "OK"), Some(&pattern), None, true);
        assert!(result.available());
        assert_eq!(result.body_match, Some(false));
    }

    #[test]
    fn test_status_mismatch_with_fail_on_mismatch() {
        let result = validate(reachable(404, "missing"), None, Some(200), true);
        assert!(!result.available());
        assert_eq!(result.status_match, Some(false));
        assert_eq!(result.outcome.status_code, Some(404));
    }

    #[test]
    fn test_status_mismatch_without_fail_on_mismatch() {
        let result = validate(reachable(404, "missing"), None, Some(200), false);
        assert!(result.available());
        assert_eq!(result.status_match, Some(false));
        assert_eq!(result.outcome.status_code, Some(404));
    }

    #[test]
    fn test_status_match() {
        let result = validate(reachable(204, ""), None, Some(204), true);
        assert!(result.available());
        assert_eq!(result.status_match, Some(true));
    }

    #[test]
    fn test_unavailable_skips_validation() {
        let pattern = regex(".*");
        let result = validate(ProbeOutcome::unreachable("timed out"), Some(&pattern), Some(200), true);
        assert!(!result.available());
        assert_eq!(result.body_match, None);
        assert_eq!(result.status_match, None);
        assert_eq!(result.outcome.reason, "timed out");
    }
}
