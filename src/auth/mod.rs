//! HTTP authentication module.
//!
//! A request carries its authentication as a raw [`AuthConfig`] (a `type` tag
//! plus string parameters). Validation turns it into the closed [`Auth`] enum,
//! checking that every parameter the scheme needs is present. After the
//! request is built, [`Auth::apply`] mutates it: headers are set (replacing
//! any value of the same name) and query parameters are appended.

pub mod api_key;
pub mod basic;
pub mod bearer;
pub mod digest;
pub mod sigv4;

pub use api_key::{ApiKey, ApiKeyLocation};
pub use digest::DigestParams;
pub use sigv4::AwsCredentials;

use crate::builder::insert_header;
use crate::environment::Environment;
use crate::error::{EngineError, Result};
use crate::variables::substitute;
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const AUTH_SCHEME_NONE: &str = "none";
pub const AUTH_SCHEME_BASIC: &str = "basic";
pub const AUTH_SCHEME_BEARER: &str = "bearer";
pub const AUTH_SCHEME_API_KEY: &str = "apiKey";
pub const AUTH_SCHEME_OAUTH2: &str = "oauth2";
pub const AUTH_SCHEME_AWS_SIGV4: &str = "awsSigV4";
pub const AUTH_SCHEME_DIGEST: &str = "digest";
pub const AUTH_SCHEME_NTLM: &str = "ntlm";

/// Authentication as it appears in a stored or submitted request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl AuthConfig {
    pub fn new(kind: impl Into<String>, params: HashMap<String, String>) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }
}

/// A validated authentication scheme with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
    ApiKey(ApiKey),
    /// Pre-obtained access token, sent as a bearer token.
    OAuth2 { access_token: String },
    AwsSigV4(AwsCredentials),
    Digest(DigestParams),
    Ntlm,
}

/// Looks up required parameters, naming the missing one on failure.
struct Params<'a>(&'a HashMap<String, String>);

impl Params<'_> {
    fn required(&self, name: &str) -> Result<String> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::validation(format!("auth.params.{}", name), "is required"))
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

impl Auth {
    /// Parses an [`AuthConfig`], checking the parameters its scheme requires.
    ///
    /// # Errors
    ///
    /// A validation error on field `auth.type` for an unknown scheme, or on
    /// `auth.params.<name>` for a missing parameter.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let params = Params(&config.params);

        let auth = match config.kind.as_str() {
            AUTH_SCHEME_NONE => Auth::None,
            AUTH_SCHEME_BASIC => Auth::Basic {
                username: params.required("username")?,
                password: params.required("password")?,
            },
            AUTH_SCHEME_BEARER => Auth::Bearer {
                token: params.required("token")?,
            },
            AUTH_SCHEME_API_KEY => Auth::ApiKey(ApiKey {
                key: params.required("key")?,
                value: params.required("value")?,
                location: params.required("in")?.parse()?,
            }),
            AUTH_SCHEME_OAUTH2 => Auth::OAuth2 {
                access_token: params.required("access_token")?,
            },
            AUTH_SCHEME_AWS_SIGV4 => Auth::AwsSigV4(AwsCredentials {
                access_key: params.required("access_key")?,
                secret_key: params.required("secret_key")?,
                session_token: params.optional("session_token"),
                region: params.required("region")?,
                service: params.required("service")?,
            }),
            AUTH_SCHEME_DIGEST => Auth::Digest(DigestParams {
                username: params.required("username")?,
                password: params.required("password")?,
                realm: params.required("realm")?,
                nonce: params.required("nonce")?,
                qop: params.required("qop")?,
                nc: params.required("nc")?,
                cnonce: params.required("cnonce")?,
            }),
            AUTH_SCHEME_NTLM => Auth::Ntlm,
            other => {
                return Err(EngineError::validation(
                    "auth.type",
                    format!("unknown authentication type '{}'", other),
                ))
            }
        };

        Ok(auth)
    }

    /// The scheme tag, as written in `auth.type`.
    pub fn scheme_name(&self) -> &'static str {
        match self {
            Auth::None => AUTH_SCHEME_NONE,
            Auth::Basic { .. } => AUTH_SCHEME_BASIC,
            Auth::Bearer { .. } => AUTH_SCHEME_BEARER,
            Auth::ApiKey(_) => AUTH_SCHEME_API_KEY,
            Auth::OAuth2 { .. } => AUTH_SCHEME_OAUTH2,
            Auth::AwsSigV4(_) => AUTH_SCHEME_AWS_SIGV4,
            Auth::Digest(_) => AUTH_SCHEME_DIGEST,
            Auth::Ntlm => AUTH_SCHEME_NTLM,
        }
    }

    /// Substitutes `{{name}}` placeholders in every parameter value.
    ///
    /// The `in` location of an API key is parsed during validation and is
    /// therefore not substituted: it must be the literal `header` or `query`.
    pub fn resolve(self, environment: Option<&Environment>) -> Self {
        let Some(env) = environment else {
            return self;
        };
        let sub = |value: String| substitute(&value, Some(env));

        match self {
            Auth::None => Auth::None,
            Auth::Basic { username, password } => Auth::Basic {
                username: sub(username),
                password: sub(password),
            },
            Auth::Bearer { token } => Auth::Bearer { token: sub(token) },
            Auth::ApiKey(key) => Auth::ApiKey(ApiKey {
                key: sub(key.key),
                value: sub(key.value),
                location: key.location,
            }),
            Auth::OAuth2 { access_token } => Auth::OAuth2 {
                access_token: sub(access_token),
            },
            Auth::AwsSigV4(creds) => Auth::AwsSigV4(AwsCredentials {
                access_key: sub(creds.access_key),
                secret_key: sub(creds.secret_key),
                session_token: creds.session_token.map(sub),
                region: sub(creds.region),
                service: sub(creds.service),
            }),
            Auth::Digest(params) => Auth::Digest(DigestParams {
                username: sub(params.username),
                password: sub(params.password),
                realm: sub(params.realm),
                nonce: sub(params.nonce),
                qop: sub(params.qop),
                nc: sub(params.nc),
                cnonce: sub(params.cnonce),
            }),
            Auth::Ntlm => Auth::Ntlm,
        }
    }

    /// Applies the scheme to a built request, signing with the current time.
    pub fn apply(&self, request: &mut reqwest::Request) -> Result<()> {
        self.apply_at(request, Utc::now())
    }

    /// Applies the scheme to a built request.
    ///
    /// `now` is only used by AWS SigV4.
    pub fn apply_at(&self, request: &mut reqwest::Request, now: DateTime<Utc>) -> Result<()> {
        match self {
            Auth::None => Ok(()),
            Auth::Basic { username, password } => set_authorization(
                request,
                &basic::basic_auth(username, password),
            ),
            Auth::Bearer { token } => set_authorization(request, &bearer::bearer_token(token)),
            Auth::ApiKey(key) => key.apply(request),
            Auth::OAuth2 { access_token } => {
                set_authorization(request, &bearer::bearer_token(access_token))
            }
            Auth::AwsSigV4(creds) => creds.sign(request, now),
            Auth::Digest(params) => {
                let value = params.header_value(request.method().as_str(), request.url().path());
                set_authorization(request, &value)
            }
            Auth::Ntlm => Err(EngineError::NotImplemented {
                scheme: AUTH_SCHEME_NTLM.to_string(),
            }),
        }
    }
}

fn set_authorization(request: &mut reqwest::Request, value: &str) -> Result<()> {
    insert_header(request.headers_mut(), AUTHORIZATION.as_str(), value, true)
}
