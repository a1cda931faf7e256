//! Agent chat endpoints: the full voice turn pipeline
//!
//! One `POST` runs the whole loop — transcribe the uploaded audio, answer
//! via a skill or the LLM, synthesize speech for LLM replies — and returns
//! everything the browser needs to render and play the turn.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::ApiState;
use crate::history::{ChatMessage, Role};
use crate::keys::Provider;
use crate::llm::ChatModel;
use crate::speech::{SpeechToText, TextToSpeech};

/// Build agent router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/agent/chat/{session_id}", post(chat).delete(clear_session))
        .route("/agent/chat/{session_id}/history", get(session_history))
        .with_state(state)
}

/// Reply for a completed agent turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub user_text: String,
    pub llm_text: String,
    /// First playable audio URL; empty for skill replies
    pub audio_url: String,
    /// All chunk URLs, in order, when the reply was split for synthesis
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audio_urls: Vec<String>,
}

/// One full voice turn: transcribe, answer, synthesize
async fn chat(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ChatResponse>, AgentError> {
    let audio = read_audio_field(multipart).await?;
    if audio.is_empty() {
        return Err(AgentError::BadRequest("empty audio upload".to_string()));
    }

    // Transcribe
    let stt_key = state
        .keys
        .get(Provider::Assemblyai)
        .await
        .ok_or(AgentError::NotConfigured(Provider::Assemblyai))?;
    let stt = SpeechToText::new(state.http.clone(), stt_key).map_err(AgentError::internal)?;
    let user_text = match stt.transcribe(&audio).await {
        Ok(text) => text.trim().to_string(),
        // The transcription service rejected the audio
        Err(crate::Error::Stt(message)) => return Err(AgentError::Transcription(message)),
        Err(e) => return Err(AgentError::internal(e)),
    };
    if user_text.is_empty() {
        return Err(AgentError::Transcription("empty transcript".to_string()));
    }
    tracing::info!(session = %session_id, transcript = %user_text, "user turn transcribed");

    // Skills bypass the LLM and TTS
    if let Some((skill, query)) = state.skills.dispatch(&user_text) {
        tracing::info!(skill = skill.name(), "dispatching skill");
        let reply = skill
            .run(query)
            .await
            .map_err(|e| AgentError::Skill(e.to_string()))?;
        state.history.append(&session_id, Role::User, &user_text).await;
        state.history.append(&session_id, Role::Model, &reply).await;
        return Ok(Json(ChatResponse {
            user_text,
            llm_text: reply,
            audio_url: String::new(),
            audio_urls: Vec::new(),
        }));
    }

    // LLM turn: the current user message joins the window before the call
    state.history.append(&session_id, Role::User, &user_text).await;

    let llm_key = state
        .keys
        .get(Provider::Gemini)
        .await
        .ok_or(AgentError::NotConfigured(Provider::Gemini))?;
    let llm = ChatModel::new(
        state.http.clone(),
        llm_key,
        state.llm_model.clone(),
        state.llm_temperature,
        state.llm_max_output_tokens,
    )
    .map_err(AgentError::internal)?;

    let window = state.history.recent(&session_id, state.history_window).await;
    let contents = ChatModel::build_contents(&state.persona.system_prompt, &window);
    let reply = llm
        .generate(contents)
        .await
        .map_err(|e| AgentError::Llm(e.to_string()))?;
    state.history.append(&session_id, Role::Model, &reply).await;

    // Synthesize
    let tts_key = state
        .keys
        .get(Provider::Murf)
        .await
        .ok_or(AgentError::NotConfigured(Provider::Murf))?;
    let tts = TextToSpeech::new(
        state.http.clone(),
        tts_key,
        state.tts_voice.clone(),
        state.tts_format.clone(),
    )
    .map_err(AgentError::internal)?;
    let audio_urls = tts
        .synthesize(&reply)
        .await
        .map_err(|e| AgentError::Tts(e.to_string()))?;
    let audio_url = audio_urls.first().cloned().unwrap_or_default();

    Ok(Json(ChatResponse {
        user_text,
        llm_text: reply,
        audio_url,
        audio_urls,
    }))
}

/// Pull the uploaded audio out of the multipart form (`file` field)
async fn read_audio_field(mut multipart: Multipart) -> Result<Vec<u8>, AgentError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AgentError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AgentError::BadRequest(format!("failed to read upload: {e}")))?;
            return Ok(data.to_vec());
        }
    }
    Err(AgentError::BadRequest(
        "missing 'file' field in upload".to_string(),
    ))
}

/// Stored transcript of a session
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

/// Get a session's transcript
async fn session_history(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    let messages = state.history.transcript(&session_id).await;
    Json(HistoryResponse {
        session_id,
        messages,
    })
}

/// Clear a session's transcript
async fn clear_session(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
) -> StatusCode {
    if state.history.clear(&session_id).await {
        tracing::info!(session = %session_id, "session history cleared");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Agent pipeline errors
#[derive(Debug)]
pub enum AgentError {
    BadRequest(String),
    NotConfigured(Provider),
    Transcription(String),
    Llm(String),
    Tts(String),
    Skill(String),
    Internal(String),
}

impl AgentError {
    fn internal(e: crate::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for AgentError {
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
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::NotConfigured(provider) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_configured",
                format!("{} API key not configured", provider.display_name()),
            ),
            Self::Transcription(msg) => (
                StatusCode::BAD_REQUEST,
                "transcription_error",
                format!("Transcription error: {msg}"),
            ),
            Self::Llm(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "llm_failed", msg),
            Self::Tts(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "synthesis_failed", msg),
            Self::Skill(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "skill_failed", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
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
