//! Response normalization.
//!
//! Collapses a `reqwest::Response` into a [`ResponseDto`]: status code, one
//! value per header name (the first one received) and the full body as text.

use crate::error::{EngineError, Result};
use crate::models::ResponseDto;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;

/// Reads the whole body and builds the response DTO.
///
/// The response is consumed, so its connection is released whether the body
/// read succeeds or fails.
pub async fn normalize(response: reqwest::Response) -> Result<ResponseDto> {
    let status_code = response.status().as_u16();
    let headers = flatten_headers(response.headers());

    let bytes = response.bytes().await.map_err(EngineError::execution)?;

    Ok(ResponseDto {
        status_code,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Keeps the first value of each header, keyed by canonical name.
pub fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .filter_map(|name| {
            headers.get(name).map(|value| {
                (
                    canonical_header_name(name.as_str()),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
        })
        .collect()
}

/// Canonical MIME form of a header name: `content-type` becomes
/// `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
