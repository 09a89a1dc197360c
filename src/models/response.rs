//! HTTP response data model.
//!
//! [`ResponseDto`] is the stable, JSON-serializable shape every execution
//! produces: `{"statusCode": int, "headers": {string: string}, "body": string}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized response returned to the caller.
///
/// Headers are single-valued. When the origin repeats a header name only the
/// first value is kept, so two `Set-Cookie` lines collapse to the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// Response headers, keyed by canonical header name.
    pub headers: BTreeMap<String, String>,

    /// Complete response body decoded as UTF-8.
    pub body: String,
}

impl ResponseDto {
    /// Creates a response with the given status code and no headers or body.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    /// Checks if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Looks up a header value, ignoring ASCII case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
