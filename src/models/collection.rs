//! Request collections and Postman v2.1 interchange.
//!
//! A collection is a named, ordered list of requests. Collections are what the
//! storage layer persists; they can also be exported to and imported from the
//! Postman collection format.

use super::request::{Header, Request};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema URL written into exported Postman collections.
pub const POSTMAN_SCHEMA_URL: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// A named group of requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Collection {
    /// Creates an empty collection with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Checks the collection name and every request in it.
    ///
    /// Errors on a request are reported with the request's index, e.g.
    /// `requests[2].method`.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("name", "collection name cannot be empty"));
        }

        for (index, request) in self.requests.iter().enumerate() {
            request.validate_for_storage().map_err(|err| match err {
                EngineError::Validation { field, reason } => EngineError::Validation {
                    field: format!("requests[{}].{}", index, field),
                    reason,
                },
                other => other,
            })?;
        }

        Ok(())
    }

    /// Validates and appends a request, assigning an id when it has none.
    ///
    /// Returns the id of the stored request.
    pub fn add_request(&mut self, mut request: Request) -> Result<String> {
        request.validate_for_storage()?;
        if request.id.is_empty() {
            request.id = Uuid::new_v4().to_string();
        }
        let id = request.id.clone();
        self.requests.push(request);
        Ok(id)
    }

    /// Removes the request with `request_id`. Returns `false` if absent.
    pub fn remove_request(&mut self, request_id: &str) -> bool {
        match self.requests.iter().position(|r| r.id == request_id) {
            Some(index) => {
                self.requests.remove(index);
                true
            }
            None => false,
        }
    }

    /// Finds a request by id.
    pub fn find_request(&self, request_id: &str) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    /// Exports the collection in Postman v2.1 format.
    ///
    /// Authentication and query parameters have no counterpart in the
    /// exported subset and are left out.
    pub fn to_postman(&self) -> PostmanCollection {
        PostmanCollection {
            info: PostmanInfo {
                name: self.name.clone(),
                description: self.description.clone(),
                schema: Some(POSTMAN_SCHEMA_URL.to_string()),
            },
            item: self
                .requests
                .iter()
                .map(|request| PostmanItem {
                    name: request.name.clone(),
                    request: PostmanRequest {
                        method: request.method.clone(),
                        url: PostmanUrl::Raw(request.url.clone()),
                        header: request.headers.clone(),
                        body: Some(PostmanBody {
                            mode: "raw".to_string(),
                            raw: request.body.clone(),
                        }),
                    },
                })
                .collect(),
        }
    }

    /// Builds a collection from a Postman export.
    ///
    /// The collection and every imported request get fresh ids. Only `raw`
    /// bodies are carried over. The result is validated before it is returned.
    pub fn from_postman(imported: PostmanCollection) -> Result<Self> {
        let mut collection = Collection {
            id: Uuid::new_v4().to_string(),
            name: imported.info.name,
            description: imported.info.description,
            requests: Vec::with_capacity(imported.item.len()),
        };

        for item in imported.item {
            let body = match item.request.body {
                Some(body) if body.mode == "raw" => body.raw,
                _ => String::new(),
            };

            collection.requests.push(Request {
                id: Uuid::new_v4().to_string(),
                name: item.name,
                method: item.request.method,
                url: item.request.url.into_raw(),
                headers: item.request.header,
                body,
                ..Default::default()
            });
        }

        collection.validate()?;
        Ok(collection)
    }
}

/// Top-level Postman collection document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: PostmanInfo,
    #[serde(default)]
    pub item: Vec<PostmanItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanItem {
    pub name: String,
    pub request: PostmanRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanRequest {
    pub method: String,
    pub url: PostmanUrl,
    #[serde(default)]
    pub header: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PostmanBody>,
}

/// Postman writes URLs either as a plain string or as an object with a
/// `raw` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanUrl {
    Raw(String),
    Structured { raw: String },
}

impl PostmanUrl {
    pub fn into_raw(self) -> String {
        match self {
            PostmanUrl::Raw(raw) | PostmanUrl::Structured { raw } => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanBody {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub raw: String,
}
