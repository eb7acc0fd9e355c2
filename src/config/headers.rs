use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::ConfigError;
use super::model::HEADERS;

/// Parse space separated `key=value` pairs into a header map.
///
/// Entries are split on the first `=`, so values may contain `=` themselves.
/// An empty string yields an empty map. Later duplicates replace earlier ones.
/// Any malformed entry fails the whole parse.
pub fn parse_headers(input: &str) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    for entry in input.split_whitespace() {
        let (name, value) = entry
            .split_once('=')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| ConfigError::MalformedHeader {
                key: HEADERS,
                entry: entry.to_string(),
            })?;

        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                key: HEADERS,
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
            key: HEADERS,
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
