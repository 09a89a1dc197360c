//! Environment management.
//!
//! Environments hold the named variables used to fill `{{name}}` placeholders
//! in a request. They are plain values: the engine reads them and never keeps
//! or modifies them.
//!
//! # Example
//!
//! ```
//! use rest_engine::environment::Environment;
//!
//! let mut env = Environment::new("dev");
//! env.set("baseUrl", "http://localhost:3000");
//! assert_eq!(env.get("baseUrl").map(String::as_str), Some("http://localhost:3000"));
//! ```

pub mod loader;
pub mod models;

pub use loader::{load_environment_file, parse_environment};
pub use models::Environment;
