//! Text-to-speech relay backed by Murf AI
//!
//! Murf returns a URL to the rendered audio rather than the bytes themselves,
//! so the gateway relays URLs and the browser streams the audio directly.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const API_BASE: &str = "https://api.murf.ai/v1";

/// Murf rejects longer inputs, so replies are split at this many characters
pub const MAX_CHUNK_CHARS: usize = 3000;

/// Request to the speech generation endpoint
#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    audio_format: &'a str,
}

/// Response from the speech generation endpoint
///
/// The field name has varied across Murf API revisions; accept both.
#[derive(Deserialize)]
struct SpeechResponse {
    #[serde(rename = "audioFile", default)]
    audio_file: Option<String>,
    #[serde(default)]
    audio_url: Option<String>,
}

/// Synthesizes speech from text via the Murf REST API
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    audio_format: String,
    base_url: String,
}

impl TextToSpeech {
    /// Create a new TTS relay
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        voice_id: String,
        audio_format: String,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("Murf API key required for TTS".to_string()));
        }

        Ok(Self {
            client,
            api_key,
            voice_id,
            audio_format,
            base_url: API_BASE.to_string(),
        })
    }

    /// Override the API base URL (for tests)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Synthesize text, splitting long input into chunks Murf will accept
    ///
    /// All chunks are requested concurrently. Returns one audio URL per
    /// chunk, in input order.
    ///
    /// # Errors
    ///
    /// Returns error on empty input, or if any chunk fails or yields no
    /// audio URL.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<String>> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(Error::Tts("empty text".to_string()));
        }
        if chunks.len() > 1 {
            tracing::debug!(chunks = chunks.len(), "splitting long reply for synthesis");
        }

        let requests = chunks.iter().map(|chunk| self.synthesize_chunk(chunk));
        futures::future::try_join_all(requests).await
    }

    /// Synthesize a single chunk, returning its audio URL
    async fn synthesize_chunk(&self, text: &str) -> Result<String> {
        let request = SpeechRequest {
            text,
            voice_id: &self.voice_id,
            audio_format: &self.audio_format,
        };

        let response = self
            .client
            .post(format!("{}/speech/generate", self.base_url))
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Murf API error");
            return Err(Error::Tts(format!("Murf API error {status}: {body}")));
        }

        let result: SpeechResponse = response.json().await?;
        result
            .audio_file
            .or(result.audio_url)
            .ok_or_else(|| Error::Tts("no audio URL in Murf response".to_string()))
    }
}

/// Split into pieces of at most `max_chars` characters
///
/// Counts characters rather than bytes so multi-byte text never splits
/// mid-character. Empty input yields no chunks.
fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
