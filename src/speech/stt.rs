//! Speech-to-text relay backed by AssemblyAI
//!
//! AssemblyAI transcription is asynchronous on their side: upload the audio,
//! create a transcript job, then poll the job until it settles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const API_BASE: &str = "https://api.assemblyai.com/v2";

const POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Poll budget: jobs still queued after this many polls are treated as failed
const MAX_POLLS: u32 = 100;

/// Response from the upload endpoint
#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Request to create a transcript job
#[derive(Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
}

/// Transcript job state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

/// Transcript job as returned by create and poll calls
#[derive(Deserialize)]
struct TranscriptResponse {
    id: String,
    status: TranscriptStatus,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Transcribes speech to text via the AssemblyAI REST API
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SpeechToText {
    /// Create a new STT relay
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(client: reqwest::Client, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "AssemblyAI API key required for STT".to_string(),
            ));
        }

        Ok(Self {
            client,
            api_key,
            base_url: API_BASE.to_string(),
        })
    }

    /// Override the API base URL (for tests)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - audio bytes in any container AssemblyAI accepts (WAV, WebM, MP3, ...)
    ///
    /// # Errors
    ///
    /// Returns `Error::Stt` if the upstream job reports an error or does not
    /// settle within the poll budget; transport failures surface as
    /// `Error::Http`.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let upload_url = self.upload(audio).await?;
        let job_id = self.create_transcript(&upload_url).await?;
        self.poll_transcript(&job_id).await
    }

    /// Upload raw audio bytes, returning the temporary audio URL
    async fn upload(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "uploading audio to AssemblyAI");

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "AssemblyAI upload error");
            return Err(Error::Stt(format!(
                "AssemblyAI upload error {status}: {body}"
            )));
        }

        let result: UploadResponse = response.json().await?;
        Ok(result.upload_url)
    }

    /// Create a transcript job for an uploaded audio URL
    async fn create_transcript(&self, audio_url: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&TranscriptRequest { audio_url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "AssemblyAI transcript error");
            return Err(Error::Stt(format!(
                "AssemblyAI transcript error {status}: {body}"
            )));
        }

        let job: TranscriptResponse = response.json().await?;
        tracing::debug!(job_id = %job.id, "transcript job created");
        Ok(job.id)
    }

    /// Poll a transcript job until it completes or errors
    async fn poll_transcript(&self, job_id: &str) -> Result<String> {
        for _ in 0..MAX_POLLS {
            let response = self
                .client
                .get(format!("{}/transcript/{job_id}", self.base_url))
                .header("authorization", &self.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Stt(format!(
                    "AssemblyAI poll error {status}: {body}"
                )));
            }

            let job: TranscriptResponse = response.json().await?;
            match job.status {
                TranscriptStatus::Completed => {
                    let text = job.text.unwrap_or_default();
                    tracing::info!(transcript = %text, "transcription complete");
                    return Ok(text);
                }
                TranscriptStatus::Error => {
                    let message = job
                        .error
                        .unwrap_or_else(|| "transcription failed".to_string());
                    tracing::error!(job_id = %job_id, error = %message, "transcript job failed");
                    return Err(Error::Stt(message));
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        Err(Error::Stt(format!(
            "transcript {job_id} did not settle in time"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let result = SpeechToText::new(reqwest::Client::new(), String::new());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn transcript_status_parses_wire_values() {
        let job: TranscriptResponse = serde_json::from_str(
            r#"{"id": "j1", "status": "completed", "text": "hello world"}"#,
        )
        .unwrap();
        assert_eq!(job.status, TranscriptStatus::Completed);
        assert_eq!(job.text.as_deref(), Some("hello world"));

        let job: TranscriptResponse =
            serde_json::from_str(r#"{"id": "j2", "status": "error", "error": "bad audio"}"#)
                .unwrap();
        assert_eq!(job.status, TranscriptStatus::Error);
        assert_eq!(job.error.as_deref(), Some("bad audio"));
    }
}
