//! Chat completion relay backed by Google Gemini

use serde::{Deserialize, Serialize};

use crate::history::ChatMessage;
use crate::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// One conversational turn in Gemini's wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Text fragment of a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Content {
    fn new(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Generates assistant replies via the Gemini REST API
pub struct ChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f64,
    max_output_tokens: u32,
    base_url: String,
}

impl ChatModel {
    /// Create a new chat relay
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        model: String,
        temperature: f64,
        max_output_tokens: u32,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("Gemini API key required for chat".to_string()));
        }

        Ok(Self {
            client,
            api_key,
            model,
            temperature,
            max_output_tokens,
            base_url: API_BASE.to_string(),
        })
    }

    /// Override the API base URL (for tests)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Assemble request contents: the persona prompt as a leading model turn,
    /// then the recent history window (which includes the current user turn)
    #[must_use]
    pub fn build_contents(persona_prompt: &str, history: &[ChatMessage]) -> Vec<Content> {
        let mut contents = Vec::with_capacity(history.len() + 1);
        contents.push(Content::new("model", persona_prompt));
        contents.extend(
            history
                .iter()
                .map(|m| Content::new(m.role.as_str(), m.text.clone())),
        );
        contents
    }

    /// Generate a reply for the assembled conversation
    ///
    /// # Errors
    ///
    /// Returns `Error::Llm` on upstream errors or when the reply is missing
    /// or empty.
    pub async fn generate(&self, contents: Vec<Content>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(Error::Llm(format!("Gemini API error {status}: {body}")));
        }

        let result: GenerateResponse = response.json().await?;
        let reply = result
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Llm("reply missing or empty".to_string()))?;

        tracing::debug!(chars = reply.len(), "LLM reply received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Role;

    #[test]
    fn contents_lead_with_persona_as_model_turn() {
        let history = vec![
            ChatMessage::new(Role::User, "hello"),
            ChatMessage::new(Role::Model, "hi!"),
            ChatMessage::new(Role::User, "what's new"),
        ];

        let contents = ChatModel::build_contents("You are Leo.", &history);

        assert_eq!(contents.len(), 4);
        assert_eq!(contents[0].role, "model");
        assert_eq!(contents[0].parts[0].text, "You are Leo.");
        assert_eq!(contents[1].role, "user");
        assert_eq!(contents[2].role, "model");
        assert_eq!(contents[3].parts[0].text, "what's new");
    }

    #[test]
    fn generation_config_uses_camel_case_on_the_wire() {
        let request = GenerateRequest {
            contents: vec![Content::new("user", "hi")],
            generation_config: GenerationConfig {
                temperature: 1.0,
                max_output_tokens: 8192,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("generationConfig").is_some());
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn response_reply_path_parses() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "  Hello there.  "}]
                }
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text = response.candidates[0].content.as_ref().unwrap().parts[0]
            .text
            .trim();
        assert_eq!(text, "Hello there.");
    }

    #[test]
    fn empty_candidates_parse_to_empty_vec() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn empty_key_is_rejected() {
        let result = ChatModel::new(
            reqwest::Client::new(),
            String::new(),
            DEFAULT_MODEL.to_string(),
            1.0,
            8192,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
