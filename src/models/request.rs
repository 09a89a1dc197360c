//! HTTP request data models.
//!
//! This module defines the declarative request a caller hands to the engine:
//! the method, URL template, headers, query parameters, body and optional
//! authentication. Every string field except header keys, the method and the
//! auth type may contain `{{variable}}` placeholders.

use crate::auth::{Auth, AuthConfig};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// HTTP request method.
///
/// Represents all standard HTTP methods as defined in RFC 7231 and RFC 5789.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP TRACE method - perform a message loop-back test
    TRACE,
    /// HTTP CONNECT method - establish a tunnel to the server
    CONNECT,
}

impl HttpMethod {
    /// Every supported method, in catalogue order.
    pub fn all() -> [HttpMethod; 9] {
        [
            HttpMethod::GET,
            HttpMethod::POST,
            HttpMethod::PUT,
            HttpMethod::DELETE,
            HttpMethod::PATCH,
            HttpMethod::HEAD,
            HttpMethod::OPTIONS,
            HttpMethod::TRACE,
            HttpMethod::CONNECT,
        ]
    }

    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
            HttpMethod::CONNECT => "CONNECT",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = EngineError;

    /// Parses a method name. Matching is case-sensitive: `get` is rejected.
    fn from_str(s: &str) -> Result<Self> {
        HttpMethod::all()
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| {
                if s.is_empty() {
                    EngineError::validation("method", "HTTP method is required")
                } else {
                    EngineError::validation("method", format!("unsupported HTTP method '{}'", s))
                }
            })
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A declarative HTTP request.
///
/// The engine never mutates a `Request`; substitution and authentication work
/// on copies and on the outbound transport request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Opaque identifier, assigned by the storage layer when empty.
    #[serde(default)]
    pub id: String,

    /// Display label.
    #[serde(default)]
    pub name: String,

    /// Method name. Kept as text so an unsupported method surfaces as a
    /// validation error rather than a decode failure.
    #[serde(default)]
    pub method: String,

    /// URL template. Must parse as an absolute URL after substitution.
    #[serde(default)]
    pub url: String,

    /// Headers in application order. A later entry with the same key
    /// replaces an earlier one.
    #[serde(default)]
    pub headers: Vec<Header>,

    /// Query parameters appended to the URL's own query string.
    #[serde(default)]
    pub query_params: BTreeMap<String, String>,

    /// Raw payload, sent verbatim. No Content-Type is implied.
    #[serde(default)]
    pub body: String,

    /// Optional authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

/// The typed parts of a request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParts {
    pub method: HttpMethod,
    pub auth: Auth,
}

impl Request {
    /// Creates a request with the given method and URL template.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Appends a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the authentication.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Validates the request for execution.
    ///
    /// Checks the method, header keys and authentication type and required
    /// parameters. The URL is checked later, after substitution.
    pub fn validate(&self) -> Result<ValidatedParts> {
        let method = self.method.parse::<HttpMethod>()?;

        for (index, header) in self.headers.iter().enumerate() {
            if header.key.is_empty() {
                return Err(EngineError::validation(
                    format!("headers[{}].key", index),
                    "header key cannot be empty",
                ));
            }
        }

        let auth = match &self.auth {
            Some(config) => Auth::from_config(config)?,
            None => Auth::None,
        };

        Ok(ValidatedParts { method, auth })
    }

    /// Validates the request for storage in a collection, which additionally
    /// requires a name.
    pub fn validate_for_storage(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("name", "request name cannot be empty"));
        }
        self.validate().map(|_| ())
    }
}
