//! REST Engine
//!
//! Executes declaratively described HTTP requests against live servers and
//! returns a normalized response.
//!
//! # Architecture
//!
//! - **models**: Requests, collections and the response DTO
//! - **environment**: Named variable sets and their file loader
//! - **variables**: `{{name}}` substitution
//! - **builder**: Turns a resolved request into a `reqwest::Request`
//! - **auth**: Basic, Bearer, API key, OAuth2, AWS SigV4 and Digest schemes
//! - **executor**: Shared HTTP client and response normalization
//! - **engine**: The end-to-end pipeline
//! - **config**: Engine settings
//! - **storage**: JSON file persistence for collections and environments
//!
//! # Pipeline
//!
//! Every execution runs the same stages in order:
//! 1. Validate the method, header keys and authentication parameters
//! 2. Substitute environment variables into URL, query values, header values,
//!    body and auth parameters
//! 3. Build the request (URL parse, query merge, headers, body)
//! 4. Apply authentication
//! 5. Dispatch and normalize the response
//!
//! A failure at any stage ends the call with an [`EngineError`]; no request is
//! sent unless stages 1 to 4 succeed.
//!
//! # Usage
//!
//! ```no_run
//! use rest_engine::{Environment, Request};
//!
//! # async fn example() -> rest_engine::Result<()> {
//! let mut env = Environment::new("dev");
//! env.set("base", "https://api.example.com");
//! env.set("token", "abc123");
//!
//! let request: Request = serde_json::from_str(r#"{
//!     "method": "GET",
//!     "url": "{{base}}/users",
//!     "queryParams": {"page": "1"},
//!     "auth": {"type": "bearer", "params": {"token": "{{token}}"}}
//! }"#)?;
//!
//! let response = rest_engine::execute(&request, Some(&env)).await?;
//! println!("{} {}", response.status_code, response.body);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod builder;
pub mod config;
pub mod engine;
pub mod environment;
pub mod error;
pub mod executor;
pub mod models;
pub mod storage;
pub mod variables;

pub use auth::{Auth, AuthConfig};
pub use config::EngineConfig;
pub use engine::{execute, RequestEngine};
pub use environment::Environment;
pub use error::{EngineError, ErrorKind, Result};
pub use models::{Collection, Header, HttpMethod, Request, ResponseDto};
pub use storage::Storage;
