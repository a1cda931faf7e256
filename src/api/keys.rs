//! Keys API backing the config panel
//!
//! Lists provider status and lets the panel set or remove keys at runtime.
//! Full keys are never echoed back; listings carry a masked preview only.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::keys::Provider;

/// Build keys router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_keys))
        .route("/{provider}", put(set_key).delete(remove_key))
        .with_state(state)
}

/// Key status for one provider, with the secret masked
#[derive(Debug, Serialize)]
pub struct KeyInfo {
    pub provider: Provider,
    pub name: &'static str,
    pub purpose: &'static str,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// All providers response
#[derive(Debug, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<KeyInfo>,
}

/// List every provider the panel can configure
async fn list_keys(State(state): State<Arc<ApiState>>) -> Json<KeysResponse> {
    let mut keys = Vec::with_capacity(Provider::ALL.len());
    for provider in Provider::ALL {
        keys.push(KeyInfo {
            provider,
            name: provider.display_name(),
            purpose: provider.purpose(),
            configured: state.keys.is_configured(provider).await,
            preview: state.keys.preview(provider).await,
        });
    }
    Json(KeysResponse { keys })
}

/// Set-key request body
#[derive(Debug, Deserialize)]
pub struct SetKeyRequest {
    pub api_key: String,
}

/// Set or replace a provider key
async fn set_key(
    State(state): State<Arc<ApiState>>,
    Path(provider): Path<Provider>,
    Json(request): Json<SetKeyRequest>,
) -> Result<StatusCode, KeyError> {
    let api_key = request.api_key.trim();
    if api_key.is_empty() {
        return Err(KeyError::EmptyKey);
    }

    state.keys.set(provider, api_key.to_string()).await;
    tracing::info!(provider = provider.slug(), "provider key updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a provider key
async fn remove_key(
    State(state): State<Arc<ApiState>>,
    Path(provider): Path<Provider>,
) -> StatusCode {
    if state.keys.remove(provider).await {
        tracing::info!(provider = provider.slug(), "provider key removed");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Keys API errors
#[derive(Debug)]
pub enum KeyError {
    EmptyKey,
}

impl IntoResponse for KeyError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::EmptyKey => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "empty_key",
                "API key must not be empty".to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}
