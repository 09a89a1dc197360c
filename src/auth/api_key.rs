//! API key authentication, sent either as a header or as a query parameter.

use crate::builder::insert_header;
use crate::error::{EngineError, Result};
use std::str::FromStr;

/// Where an API key is placed on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyLocation {
    Header,
    Query,
}

impl FromStr for ApiKeyLocation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "header" => Ok(ApiKeyLocation::Header),
            "query" => Ok(ApiKeyLocation::Query),
            _ => Err(EngineError::validation(
                "auth.params.in",
                "must be 'header' or 'query'",
            )),
        }
    }
}

/// An API key and its placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub key: String,
    pub value: String,
    pub location: ApiKeyLocation,
}

impl ApiKey {
    /// Sets the header (replacing any existing value) or appends the query
    /// parameter.
    pub fn apply(&self, request: &mut reqwest::Request) -> Result<()> {
        match self.location {
            ApiKeyLocation::Header => {
                insert_header(request.headers_mut(), &self.key, &self.value, true)
            }
            ApiKeyLocation::Query => {
                request
                    .url_mut()
                    .query_pairs_mut()
                    .append_pair(&self.key, &self.value);
                Ok(())
            }
        }
    }
}
