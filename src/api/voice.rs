//! Direct voice relay endpoints for speech-to-text and text-to-speech
//!
//! These expose the two halves of the agent pipeline separately so the
//! frontend (or curl) can exercise them on their own.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::keys::Provider;
use crate::speech::{SpeechToText, TextToSpeech};

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/synthesize", post(synthesize))
        .route("/capabilities", get(capabilities))
        .with_state(state)
}

/// Voice capabilities response
#[derive(Debug, Serialize)]
pub struct VoiceCapabilities {
    pub stt_available: bool,
    pub tts_available: bool,
}

/// Get voice capabilities
async fn capabilities(State(state): State<Arc<ApiState>>) -> Json<VoiceCapabilities> {
    Json(VoiceCapabilities {
        stt_available: state.keys.is_configured(Provider::Assemblyai).await,
        tts_available: state.keys.is_configured(Provider::Murf).await,
    })
}

/// Transcription response
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Transcribe audio to text
///
/// Accepts raw audio bytes in any container AssemblyAI understands.
async fn transcribe(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<TranscribeResponse>, VoiceError> {
    let api_key = state
        .keys
        .get(Provider::Assemblyai)
        .await
        .ok_or(VoiceError::NotConfigured("STT not configured (no AssemblyAI key)"))?;

    if body.is_empty() {
        return Err(VoiceError::BadRequest("Empty audio data"));
    }

    let stt = SpeechToText::new(state.http.clone(), api_key)
        .map_err(|e| VoiceError::TranscriptionFailed(e.to_string()))?;
    let text = stt
        .transcribe(&body)
        .await
        .map_err(|e| VoiceError::TranscriptionFailed(e.to_string()))?;

    Ok(Json(TranscribeResponse { text }))
}

/// Synthesis request
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

/// Synthesis response: Murf hosts the audio, so the reply carries URLs
#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub audio_url: String,
    pub audio_urls: Vec<String>,
}

/// Synthesize text to speech
async fn synthesize(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Json<SynthesizeResponse>, VoiceError> {
    let api_key = state
        .keys
        .get(Provider::Murf)
        .await
        .ok_or(VoiceError::NotConfigured("TTS not configured (no Murf key)"))?;

    if request.text.is_empty() {
        return Err(VoiceError::BadRequest("Empty text"));
    }

    let tts = TextToSpeech::new(
        state.http.clone(),
        api_key,
        state.tts_voice.clone(),
        state.tts_format.clone(),
    )
    .map_err(|e| VoiceError::SynthesisFailed(e.to_string()))?;

    let audio_urls = tts
        .synthesize(&request.text)
        .await
        .map_err(|e| VoiceError::SynthesisFailed(e.to_string()))?;
    let audio_url = audio_urls.first().cloned().unwrap_or_default();

    Ok(Json(SynthesizeResponse {
        audio_url,
        audio_urls,
    }))
}

/// Voice API errors
#[derive(Debug)]
pub enum VoiceError {
    NotConfigured(&'static str),
    BadRequest(&'static str),
    TranscriptionFailed(String),
    SynthesisFailed(String),
}

impl IntoResponse for VoiceError {
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
            Self::NotConfigured(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_configured",
                msg.to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.to_string()),
            Self::TranscriptionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "transcription_failed",
                msg,
            ),
            Self::SynthesisFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "synthesis_failed", msg)
            }
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
