//! Request execution pipeline.
//!
//! `validate -> substitute -> build -> authenticate -> dispatch -> normalize`.
//! Each stage runs once and the first failure ends the call; nothing touches
//! the network unless every earlier stage succeeded.

use crate::builder::{build_request, resolve};
use crate::config::EngineConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::executor::Executor;
use crate::models::{Request, ResponseDto};
use crate::variables::unresolved_placeholders;
use log::{debug, warn};
use once_cell::sync::OnceCell;

/// Executes declarative requests against live servers.
///
/// Holds no per-call state. Clones share the connection pool, so one engine
/// can serve many concurrent executions.
#[derive(Debug, Clone)]
pub struct RequestEngine {
    executor: Executor,
}

impl RequestEngine {
    /// Creates an engine whose client follows `config`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            executor: Executor::new(config)?,
        })
    }

    /// Runs every stage before dispatch and returns the outbound request.
    ///
    /// # Arguments
    ///
    /// * `request` - The declarative request
    /// * `environment` - Variables for `{{name}}` placeholders, if any
    ///
    /// # Returns
    ///
    /// * `Ok(reqwest::Request)` - Built and authenticated
    /// * `Err(EngineError)` - Validation, construction, authentication or
    ///   not-implemented errors
    pub fn prepare(
        &self,
        request: &Request,
        environment: Option<&Environment>,
    ) -> Result<reqwest::Request> {
        let parts = request.validate()?;
        debug!(
            "Validated {} request with {} auth",
            parts.method,
            parts.auth.scheme_name()
        );

        let resolved = resolve(request, environment);
        warn_unresolved(&resolved);

        let auth = parts.auth.resolve(environment);
        let mut outbound = build_request(&resolved, parts.method)?;
        debug!("Built request for {}", outbound.url().path());

        auth.apply(&mut outbound)?;
        debug!("Applied {} authentication", auth.scheme_name());

        Ok(outbound)
    }

    /// Executes `request` and returns the normalized response.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rest_engine::config::EngineConfig;
    /// use rest_engine::engine::RequestEngine;
    /// use rest_engine::environment::Environment;
    /// use rest_engine::models::Request;
    ///
    /// # async fn example() -> rest_engine::error::Result<()> {
    /// let engine = RequestEngine::new(&EngineConfig::default())?;
    ///
    /// let mut env = Environment::new("dev");
    /// env.set("base", "http://localhost:3000");
    ///
    /// let request = Request::new("GET", "{{base}}/health");
    /// let response = engine.execute(&request, Some(&env)).await?;
    /// println!("{}", response.status_code);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(
        &self,
        request: &Request,
        environment: Option<&Environment>,
    ) -> Result<ResponseDto> {
        let outbound = self.prepare(request, environment)?;
        self.executor.execute(outbound).await
    }
}

/// Executes `request` with an engine built from the default configuration.
///
/// The engine is created on first use and reused afterwards, so repeated
/// calls share one connection pool.
pub async fn execute(request: &Request, environment: Option<&Environment>) -> Result<ResponseDto> {
    static DEFAULT_ENGINE: OnceCell<RequestEngine> = OnceCell::new();

    let engine = DEFAULT_ENGINE.get_or_try_init(|| RequestEngine::new(&EngineConfig::default()))?;
    engine.execute(request, environment).await
}

fn warn_unresolved(request: &Request) {
    let mut names = unresolved_placeholders(&request.url);
    for text in request
        .query_params
        .values()
        .chain(request.headers.iter().map(|h| &h.value))
        .chain(std::iter::once(&request.body))
    {
        for name in unresolved_placeholders(text) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    if !names.is_empty() {
        warn!("Unresolved variables left in request: {}", names.join(", "));
    }
}
