//! API endpoint integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use leo_gateway::api;
use leo_gateway::keys::Provider;
use leo_gateway::Config;
use tower::ServiceExt;

mod common;
use common::{body_json, test_router, test_state};

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_without_keys_is_degraded() {
    let app = test_router();

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["stt"]["status"], "unavailable");
    assert_eq!(json["checks"]["llm"]["status"], "unavailable");
    assert_eq!(json["checks"]["news"]["status"], "unavailable");
}

#[tokio::test]
async fn test_ready_with_core_keys_is_ok() {
    let state = test_state();
    state.keys.set(Provider::Assemblyai, "a-key".to_string()).await;
    state.keys.set(Provider::Murf, "m-key".to_string()).await;
    state.keys.set(Provider::Gemini, "g-key".to_string()).await;
    let app = api::build_router(state, None);

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    // News stays optional: missing key does not degrade readiness
    assert_eq!(json["checks"]["news"]["status"], "unavailable");
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["persona"], "Leo");
    assert_eq!(json["voice_available"], false);
    assert!(json["llm_model"].is_string());
}

#[tokio::test]
async fn test_keys_list_starts_unconfigured() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/keys")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let keys = json["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 4);
    for key in keys {
        assert_eq!(key["configured"], false);
        assert!(key["preview"].is_null());
    }
}

#[tokio::test]
async fn test_set_key_then_list_shows_masked_preview() {
    let state = test_state();
    let app = api::build_router(state, None);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/keys/gemini")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"api_key": "g-secret-key-1234"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/keys")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    let gemini = json["keys"]
        .as_array()
        .unwrap()
        .iter()
        .find(|k| k["provider"] == "gemini")
        .unwrap();

    assert_eq!(gemini["configured"], true);
    let preview = gemini["preview"].as_str().unwrap();
    assert!(preview.ends_with("1234"));
    assert!(!preview.contains("g-secret"));
}

#[tokio::test]
async fn test_set_empty_key_is_rejected() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/keys/murf")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"api_key": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "empty_key");
}

#[tokio::test]
async fn test_remove_key() {
    let state = test_state();
    state.keys.set(Provider::Newsapi, "n-key".to_string()).await;
    let app = api::build_router(state, None);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/keys/newsapi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A second delete finds nothing
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/keys/newsapi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_provider_is_rejected() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/keys/openai")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"api_key": "whatever"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_rate_limit_rejects_over_quota() {
    let mut config = Config::default();
    config.api_keys = leo_gateway::config::ApiKeys::default();
    config.server.rate_limit_rpm = Some(2);
    let state = leo_gateway::api::ApiState::from_config(&config);
    let app = api::build_router(state, None);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
