//! HTTP API server for the Leo gateway

pub mod agent;
pub mod health;
pub mod keys;
pub mod rate_limit;
pub mod voice;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::history::HistoryStore;
use crate::keys::KeyStore;
use crate::persona::Persona;
use crate::skills::{NewsSkill, SkillRegistry, WebSearchSkill};
use crate::Result;

/// Upload cap for recorded audio
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state for API handlers
pub struct ApiState {
    /// Shared HTTP client for all upstream calls
    pub http: reqwest::Client,
    pub keys: Arc<KeyStore>,
    pub history: HistoryStore,
    pub skills: SkillRegistry,
    pub persona: Persona,
    pub llm_model: String,
    pub llm_temperature: f64,
    pub llm_max_output_tokens: u32,
    pub history_window: usize,
    pub tts_voice: String,
    pub tts_format: String,
    pub rate_limiter: Option<rate_limit::SharedLimiter>,
}

impl ApiState {
    /// Assemble state from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Arc<Self> {
        let http = reqwest::Client::new();
        let keys = Arc::new(KeyStore::with_keys(config.api_keys.initial_keys()));

        let mut skills = SkillRegistry::new();
        skills.register(Box::new(WebSearchSkill::new(http.clone())));
        skills.register(Box::new(NewsSkill::new(http.clone(), keys.clone())));

        let rate_limiter = config
            .server
            .rate_limit_rpm
            .map(rate_limit::create_limiter);

        Arc::new(Self {
            http,
            keys,
            history: HistoryStore::new(),
            skills,
            persona: config.persona.clone(),
            llm_model: config.llm.model.clone(),
            llm_temperature: config.llm.temperature,
            llm_max_output_tokens: config.llm.max_output_tokens,
            history_window: config.llm.history_window,
            tts_voice: config.voice.tts_voice.clone(),
            tts_format: config.voice.tts_format.clone(),
            rate_limiter,
        })
    }
}

/// Assemble all routes onto a single router
pub fn build_router(state: Arc<ApiState>, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .merge(agent::router(state.clone()))
        .nest("/api/voice", voice::router(state.clone()))
        .nest("/api/keys", keys::router(state.clone()))
        .merge(health::router())
        .merge(health::status_router(state.clone()));

    // Serve the web frontend if configured
    if let Some(dir) = static_dir {
        let index_file = dir.join("index.html");
        let serve_dir = ServeDir::new(dir).not_found_service(ServeFile::new(&index_file));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %dir.display(), "serving static files");
    }

    let router = router
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(axum::middleware::from_fn_with_state(
            state,
            rate_limit::rate_limit_middleware,
        ));

    // CORS layer for cross-origin requests from the frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Create a server from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            state: ApiState::from_config(config),
            port: config.server.port,
            static_dir: config.server.static_dir.clone(),
        }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.static_dir.as_deref())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        let router = self.router();
        axum::serve(listener, router)
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
