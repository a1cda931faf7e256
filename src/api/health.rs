//! Health check endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::ApiState;
use crate::keys::Provider;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

/// Individual readiness checks, one per wrapped provider
#[derive(Serialize)]
pub struct ReadinessChecks {
    pub stt: CheckResult,
    pub tts: CheckResult,
    pub llm: CheckResult,
    pub news: CheckResult,
}

/// Result of a single health check
#[derive(Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    const fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            status: "unavailable",
            message: Some("no API key configured".to_string()),
        }
    }
}

/// Liveness probe - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - can the service complete a voice turn?
///
/// The news key is optional: the skill degrades gracefully without it.
async fn ready(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<ReadinessResponse>) {
    let stt = check_key(&state, Provider::Assemblyai).await;
    let tts = check_key(&state, Provider::Murf).await;
    let llm = check_key(&state, Provider::Gemini).await;
    let news = check_key(&state, Provider::Newsapi).await;

    let core_ok = stt.status == "ok" && tts.status == "ok" && llm.status == "ok";
    let status = if core_ok { "ok" } else { "degraded" };
    let http_status = if core_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(ReadinessResponse {
            status,
            checks: ReadinessChecks {
                stt,
                tts,
                llm,
                news,
            },
        }),
    )
}

/// Check whether a provider key is present
async fn check_key(state: &ApiState, provider: Provider) -> CheckResult {
    if state.keys.is_configured(provider).await {
        CheckResult::ok()
    } else {
        CheckResult::unavailable()
    }
}

/// System status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub persona: String,
    pub llm_model: String,
    pub voice_available: bool,
}

/// Get system status including the active model
async fn status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    let stt = state.keys.is_configured(Provider::Assemblyai).await;
    let tts = state.keys.is_configured(Provider::Murf).await;

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        persona: state.persona.name.clone(),
        llm_model: state.llm_model.clone(),
        voice_available: stt && tts,
    })
}

/// Build health router (liveness only, no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build readiness/status router (needs state for checks)
pub fn status_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .route("/api/status", get(status))
        .with_state(state)
}
