//! Integration tests module for REST Engine
//!
//! Shared helpers for tests that drive the engine against a local
//! `wiremock` server.

pub mod auth_test;
pub mod execute_test;
pub mod storage_test;

use rest_engine::{EngineConfig, Environment, RequestEngine};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Engine with default settings
pub fn create_test_engine() -> RequestEngine {
    init_test_env();
    RequestEngine::new(&EngineConfig::default()).expect("Failed to create engine")
}

/// Environment pointing `base` at the mock server
pub fn create_test_environment(base_url: &str) -> Environment {
    let mut env = Environment::new("test");
    env.set("base", base_url);
    env.set("id", "42");
    env.set("token", "secret-token");
    env
}
