//! Error types for request execution.
//!
//! Every failure the engine can produce is an [`EngineError`]. Callers that need
//! to branch (for example to pick an HTTP status for a route layer) should use
//! [`EngineError::kind`] rather than inspecting the message text.
//!
//! Messages are safe to show to users: they name fields and parameters but never
//! echo credential values, header values or the query string of the target URL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Input was rejected before any network activity.
    Validation,
    /// The selected authentication scheme is recognised but not supported.
    NotImplemented,
    /// The outbound request envelope could not be assembled.
    Construction,
    /// An authentication scheme failed while computing its credentials.
    Authentication,
    /// The transport failed (DNS, connect, TLS, timeout, body read).
    Execution,
    /// A stored item does not exist.
    NotFound,
    /// Reading or writing stored items failed.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotImplemented => "notImplemented",
            ErrorKind::Construction => "construction",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Execution => "execution",
            ErrorKind::NotFound => "notFound",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by the request engine and its storage layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A field of the request, environment or configuration is invalid.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The authentication scheme exists but has no implementation.
    #[error("{scheme} authentication is not implemented")]
    NotImplemented { scheme: String },

    /// The request envelope could not be built.
    #[error("failed to construct request: {0}")]
    Construction(String),

    /// A scheme failed while computing credentials.
    #[error("failed to apply {scheme} authentication: {reason}")]
    Authentication { scheme: String, reason: String },

    /// Network-level failure while dispatching or reading the response.
    #[error("failed to execute request: {source}")]
    Execution {
        #[source]
        source: reqwest::Error,
    },

    /// A stored item was not found.
    #[error("{item} '{id}' not found")]
    NotFound { item: &'static str, id: String },

    /// Storage I/O failed.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored or supplied JSON document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Creates a validation error for `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an authentication error for `scheme`.
    pub fn authentication(scheme: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Authentication {
            scheme: scheme.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a transport error, dropping the URL so query-string secrets
    /// (API keys, signatures) never reach the message.
    pub fn execution(source: reqwest::Error) -> Self {
        EngineError::Execution {
            source: source.without_url(),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation { .. } => ErrorKind::Validation,
            EngineError::NotImplemented { .. } => ErrorKind::NotImplemented,
            EngineError::Construction(_) => ErrorKind::Construction,
            EngineError::Authentication { .. } => ErrorKind::Authentication,
            EngineError::Execution { .. } => ErrorKind::Execution,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Storage { .. } | EngineError::Serialization(_) => ErrorKind::Storage,
        }
    }

    /// The field a validation error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the transport gave up because the timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, EngineError::Execution { source } if source.is_timeout())
    }

    /// HTTP status a route layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::NotImplemented => 501,
            ErrorKind::Construction
            | ErrorKind::Authentication
            | ErrorKind::Execution
            | ErrorKind::Storage => 500,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
