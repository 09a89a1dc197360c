//! Request builder.
//!
//! Turns a declarative [`Request`] into a `reqwest::Request`: templates are
//! resolved against the environment, the URL is parsed, query parameters are
//! appended to whatever query the URL already has, headers are set and the
//! body is attached as-is.

use crate::environment::Environment;
use crate::error::{EngineError, Result};
use crate::models::{Header, HttpMethod, Request};
use crate::variables::substitute;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Method, Url};

/// Headers whose values are marked sensitive so they are redacted from
/// `Debug` output.
const SENSITIVE_HEADERS: [&str; 3] = ["authorization", "proxy-authorization", "cookie"];

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
            HttpMethod::PUT => Method::PUT,
            HttpMethod::DELETE => Method::DELETE,
            HttpMethod::PATCH => Method::PATCH,
            HttpMethod::HEAD => Method::HEAD,
            HttpMethod::OPTIONS => Method::OPTIONS,
            HttpMethod::TRACE => Method::TRACE,
            HttpMethod::CONNECT => Method::CONNECT,
        }
    }
}

/// Substitutes `{{name}}` placeholders in the URL, query values, header
/// values and body.
///
/// Header keys, the method and the auth block are left untouched; auth
/// parameters are resolved separately once the scheme has been validated.
pub fn resolve(request: &Request, environment: Option<&Environment>) -> Request {
    let Some(env) = environment else {
        return request.clone();
    };

    Request {
        url: substitute(&request.url, Some(env)),
        headers: request
            .headers
            .iter()
            .map(|h| Header::new(h.key.clone(), substitute(&h.value, Some(env))))
            .collect(),
        query_params: request
            .query_params
            .iter()
            .map(|(k, v)| (k.clone(), substitute(v, Some(env))))
            .collect(),
        body: substitute(&request.body, Some(env)),
        ..request.clone()
    }
}

/// Parses a resolved URL, accepting only `http` and `https`.
pub fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| EngineError::validation("url", format!("invalid URL: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(EngineError::validation(
            "url",
            format!("unsupported URL scheme '{}'", scheme),
        )),
    }
}

/// Builds the outbound request from an already resolved [`Request`].
///
/// # Arguments
///
/// * `request` - The resolved request
/// * `method` - The method parsed during validation
///
/// # Returns
///
/// * `Ok(reqwest::Request)` - Ready for authentication and dispatch
/// * `Err(EngineError)` - Validation error for a bad URL, construction error
///   for a header that cannot be represented
pub fn build_request(request: &Request, method: HttpMethod) -> Result<reqwest::Request> {
    let mut url = parse_url(&request.url)?;

    if !request.query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &request.query_params {
            pairs.append_pair(name, value);
        }
    }

    let mut outbound = reqwest::Request::new(method.into(), url);

    // Later duplicates replace earlier ones
    for header in &request.headers {
        insert_header(outbound.headers_mut(), &header.key, &header.value, false)?;
    }

    if !request.body.is_empty() {
        *outbound.body_mut() = Some(Body::from(request.body.clone()));
    }

    Ok(outbound)
}

/// Sets `name` to `value`, replacing existing values.
///
/// Errors mention the header name only, never the value.
pub(crate) fn insert_header(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    sensitive: bool,
) -> Result<()> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| EngineError::Construction(format!("invalid header name '{}'", name)))?;

    let mut header_value = HeaderValue::from_str(value).map_err(|_| {
        EngineError::Construction(format!("invalid value for header '{}'", header_name))
    })?;
    header_value.set_sensitive(sensitive || SENSITIVE_HEADERS.contains(&header_name.as_str()));

    headers.insert(header_name, header_value);
    Ok(())
}
