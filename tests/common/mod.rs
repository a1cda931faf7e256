//! Shared test utilities

use std::sync::Arc;

use leo_gateway::api::{self, ApiState};
use leo_gateway::Config;

/// State over default configuration with no keys configured
///
/// Startup keys are cleared explicitly so ambient environment variables
/// can't leak into test assertions.
pub fn test_state() -> Arc<ApiState> {
    let mut config = Config::default();
    config.api_keys = leo_gateway::config::ApiKeys::default();
    ApiState::from_config(&config)
}

/// Router over keyless default configuration, no static files
pub fn test_router() -> axum::Router {
    api::build_router(test_state(), None)
}

/// Decode a response body as JSON
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&body).expect("body is not valid JSON")
}
