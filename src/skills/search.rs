//! Keyless web search via the DuckDuckGo Instant Answer API

use async_trait::async_trait;
use serde::Deserialize;

use super::Skill;
use crate::{Error, Result};

const API_URL: &str = "https://api.duckduckgo.com/";

/// Instant answer payload, reduced to the fields the skill reads
#[derive(Debug, Default, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Default, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "FirstURL", default)]
    first_url: Option<String>,
}

/// `search:` skill — answers from DuckDuckGo instant answers
pub struct WebSearchSkill {
    client: reqwest::Client,
    base_url: String,
}

impl WebSearchSkill {
    /// Create the search skill
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: API_URL.to_string(),
        }
    }

    /// Override the API base URL (for tests)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Pick the best available answer from the instant-answer payload
    fn format_answer(answer: &InstantAnswer) -> String {
        if !answer.abstract_text.is_empty() {
            return answer.abstract_text.clone();
        }
        if let Some(first) = answer.related_topics.first() {
            if let Some(text) = &first.text {
                return text.clone();
            }
            if let Some(url) = &first.first_url {
                return format!("Here's a link: {url}");
            }
        }
        if !answer.heading.is_empty() {
            return format!(
                "I found something about {}, but details are limited.",
                answer.heading
            );
        }
        "No direct answer found, try refining your query.".to_string()
    }
}

#[async_trait]
impl Skill for WebSearchSkill {
    fn prefix(&self) -> &'static str {
        "search:"
    }

    fn name(&self) -> &'static str {
        "web_search"
    }

    async fn run(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "instant answer API unavailable");
            return Ok("Web search service is currently unavailable.".to_string());
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("instant answer payload: {e}")))?;
        Ok(Self::format_answer(&answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abstract_text_wins() {
        let answer = InstantAnswer {
            abstract_text: "Rust is a systems language.".to_string(),
            heading: "Rust".to_string(),
            related_topics: vec![RelatedTopic {
                text: Some("ignored".to_string()),
                first_url: None,
            }],
        };
        assert_eq!(
            WebSearchSkill::format_answer(&answer),
            "Rust is a systems language."
        );
    }

    #[test]
    fn falls_back_to_first_topic_text() {
        let answer = InstantAnswer {
            related_topics: vec![RelatedTopic {
                text: Some("A topic snippet".to_string()),
                first_url: Some("https://example.com".to_string()),
            }],
            ..InstantAnswer::default()
        };
        assert_eq!(WebSearchSkill::format_answer(&answer), "A topic snippet");
    }

    #[test]
    fn falls_back_to_topic_link() {
        let answer = InstantAnswer {
            related_topics: vec![RelatedTopic {
                text: None,
                first_url: Some("https://example.com".to_string()),
            }],
            ..InstantAnswer::default()
        };
        assert_eq!(
            WebSearchSkill::format_answer(&answer),
            "Here's a link: https://example.com"
        );
    }

    #[test]
    fn falls_back_to_heading() {
        let answer = InstantAnswer {
            heading: "Obscure Topic".to_string(),
            ..InstantAnswer::default()
        };
        assert_eq!(
            WebSearchSkill::format_answer(&answer),
            "I found something about Obscure Topic, but details are limited."
        );
    }

    #[test]
    fn empty_payload_gets_generic_reply() {
        let answer = InstantAnswer::default();
        assert_eq!(
            WebSearchSkill::format_answer(&answer),
            "No direct answer found, try refining your query."
        );
    }

    #[test]
    fn instant_answer_parses_pascal_case_fields() {
        let raw = r#"{
            "AbstractText": "An answer.",
            "Heading": "Thing",
            "RelatedTopics": [{"Text": "t", "FirstURL": "https://x"}]
        }"#;
        let answer: InstantAnswer = serde_json::from_str(raw).unwrap();
        assert_eq!(answer.abstract_text, "An answer.");
        assert_eq!(answer.related_topics.len(), 1);
    }
}
