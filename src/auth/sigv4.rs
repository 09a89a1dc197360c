//! AWS Signature Version 4 request signing.
//!
//! Signs the fully built request in place: adds `x-amz-date` (and
//! `x-amz-security-token` for temporary credentials), then computes the
//! `Authorization` header over the canonical request.
//!
//! Canonicalization rules:
//! - URI: each path segment percent-decoded and re-encoded with the RFC 3986
//!   unreserved set, so an encoded `%2F` stays inside its segment
//! - Query: every pair decoded, re-encoded, sorted by name then value. The
//!   canonical form replaces the URL's query so the sent query is the signed one
//! - Headers: `host` plus every header on the request except
//!   `authorization`, `user-agent` and `x-amzn-trace-id`, lowercased, values
//!   trimmed with inner whitespace collapsed
//! - Payload: SHA-256 of the body bytes (of the empty string when absent)

use super::AUTH_SCHEME_AWS_SIGV4;
use crate::builder::insert_header;
use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::AUTHORIZATION;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// RFC 3986 unreserved characters stay literal, everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Headers that proxies and clients are known to rewrite.
const UNSIGNED_HEADERS: [&str; 3] = ["authorization", "user-agent", "x-amzn-trace-id"];

/// Credentials and scope used to sign a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
    pub region: String,
    pub service: String,
}

impl AwsCredentials {
    /// Signs `request` as of `now`.
    pub fn sign(&self, request: &mut reqwest::Request, now: DateTime<Utc>) -> Result<()> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        insert_header(request.headers_mut(), "x-amz-date", &amz_date, false)?;
        if let Some(token) = self.session_token.as_deref().filter(|t| !t.is_empty()) {
            insert_header(request.headers_mut(), "x-amz-security-token", token, true)?;
        }

        let query = canonical_query(request.url());
        if request.url().query().is_some() {
            request
                .url_mut()
                .set_query((!query.is_empty()).then_some(query.as_str()));
        }

        let payload_hash = hex::encode(Sha256::digest(payload_bytes(request)?));
        let (canonical_headers, signed_headers) = canonical_headers(request);

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method().as_str(),
            canonical_uri(request.url()),
            query,
            canonical_headers,
            signed_headers,
            payload_hash
        );

        let scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = hex::encode(self.signing_key(&date)?.sign(&string_to_sign)?);
        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key, scope, signed_headers, signature
        );

        insert_header(
            request.headers_mut(),
            AUTHORIZATION.as_str(),
            &authorization,
            true,
        )
    }

    fn signing_key(&self, date: &str) -> Result<SigningKey> {
        let k_date = hmac_sha256(format!("AWS4{}", self.secret_key).as_bytes(), date)?;
        let k_region = hmac_sha256(&k_date, &self.region)?;
        let k_service = hmac_sha256(&k_region, &self.service)?;
        Ok(SigningKey(hmac_sha256(&k_service, "aws4_request")?))
    }
}

struct SigningKey(Vec<u8>);

impl SigningKey {
    fn sign(&self, data: &str) -> Result<Vec<u8>> {
        hmac_sha256(&self.0, data)
    }
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| EngineError::authentication(AUTH_SCHEME_AWS_SIGV4, "invalid signing key"))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn payload_bytes(request: &reqwest::Request) -> Result<&[u8]> {
    match request.body() {
        None => Ok(&[][..]),
        Some(body) => body.as_bytes().ok_or_else(|| {
            EngineError::authentication(AUTH_SCHEME_AWS_SIGV4, "streaming bodies cannot be signed")
        }),
    }
}

fn canonical_uri(url: &url::Url) -> String {
    let path = url.path();
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, UNRESERVED).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn canonical_query(url: &url::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, UNRESERVED).to_string(),
                utf8_percent_encode(&v, UNRESERVED).to_string(),
            )
        })
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Returns the canonical header block and the `;`-joined signed header list.
fn canonical_headers(request: &reqwest::Request) -> (String, String) {
    let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, value) in request.headers() {
        let name = name.as_str();
        if UNSIGNED_HEADERS.contains(&name) {
            continue;
        }
        let value = String::from_utf8_lossy(value.as_bytes());
        headers
            .entry(name.to_string())
            .or_default()
            .push(value.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    if !headers.contains_key("host") {
        headers.insert("host".to_string(), vec![host_header(request.url())]);
    }

    let mut block = String::new();
    for (name, values) in &headers {
        block.push_str(name);
        block.push(':');
        block.push_str(&values.join(","));
        block.push('\n');
    }
    let signed = headers.keys().cloned().collect::<Vec<_>>().join(";");

    (block, signed)
}

/// The `Host` value the transport will send: host plus any non-default port.
fn host_header(url: &url::Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
