//! HTTP request executor.
//!
//! Dispatches built requests over one shared `reqwest::Client`. The client
//! pools connections and is safe to use from many tasks at once; cloning an
//! [`Executor`] shares the pool.

pub mod normalize;

pub use normalize::{canonical_header_name, flatten_headers, normalize};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::ResponseDto;
use log::{debug, info};
use reqwest::redirect::Policy;
use std::time::Instant;

/// Sends requests and normalizes their responses.
#[derive(Debug, Clone)]
pub struct Executor {
    client: reqwest::Client,
}

impl Executor {
    /// Builds the shared client from `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Timeout, redirect, TLS and user agent settings
    ///
    /// # Returns
    ///
    /// * `Ok(Executor)` - Ready to dispatch
    /// * `Err(EngineError::Construction)` - If the TLS backend fails to initialise
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            Policy::limited(config.max_redirects as usize)
        } else {
            Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(redirect)
            .danger_accept_invalid_certs(!config.validate_ssl)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                EngineError::Construction(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Sends `request` and reads the complete response.
    ///
    /// Transport failures (DNS, connect, TLS, timeout, body read) become
    /// [`EngineError::Execution`]. Any HTTP status, including 4xx and 5xx, is
    /// a successful result.
    pub async fn execute(&self, request: reqwest::Request) -> Result<ResponseDto> {
        let method = request.method().clone();
        let host = request.url().host_str().unwrap_or_default().to_string();
        let path = request.url().path().to_string();
        let start = Instant::now();

        debug!("Dispatching {} {}{}", method, host, path);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(EngineError::execution)?;

        let normalized = normalize(response).await?;

        info!(
            "{} {}{} -> {} ({} bytes, {}ms)",
            method,
            host,
            path,
            normalized.status_code,
            normalized.body.len(),
            start.elapsed().as_millis()
        );

        Ok(normalized)
    }
}
