//! Latest-news skill backed by NewsAPI top headlines

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::Skill;
use crate::keys::{KeyStore, Provider};
use crate::{Error, Result};

const API_URL: &str = "https://newsapi.org/v2/top-headlines";
const PAGE_SIZE: usize = 5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
}

/// `news:` skill — reads top headlines for a topic
///
/// Holds the key store rather than a fixed key: the skill lives for the
/// whole process, and a NewsAPI key may arrive through the config panel
/// after startup.
pub struct NewsSkill {
    client: reqwest::Client,
    keys: Arc<KeyStore>,
    base_url: String,
}

impl NewsSkill {
    /// Create the news skill
    #[must_use]
    pub fn new(client: reqwest::Client, keys: Arc<KeyStore>) -> Self {
        Self {
            client,
            keys,
            base_url: API_URL.to_string(),
        }
    }

    /// Override the API base URL (for tests)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Render headlines as the spoken-friendly bullet list
    fn format_headlines(topic: &str, articles: &[Article]) -> String {
        if articles.is_empty() {
            return format!("No news found for '{topic}'.");
        }
        let headlines: Vec<String> = articles.iter().map(|a| format!("- {}", a.title)).collect();
        format!("Here are the top headlines:\n{}", headlines.join("\n"))
    }
}

#[async_trait]
impl Skill for NewsSkill {
    fn prefix(&self) -> &'static str {
        "news:"
    }

    fn name(&self) -> &'static str {
        "latest_news"
    }

    async fn run(&self, topic: &str) -> Result<String> {
        let Some(api_key) = self.keys.get(Provider::Newsapi).await else {
            return Ok("NewsAPI key not configured; news feature unavailable.".to_string());
        };

        // The key rides in the query string, so the URL must never be logged
        let url = format!(
            "{}?q={}&language=en&pageSize={}&apiKey={}",
            self.base_url,
            urlencoding::encode(topic),
            PAGE_SIZE,
            api_key
        );

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(status = %status, "NewsAPI response");
        if !status.is_success() {
            return Ok("News service is currently unavailable.".to_string());
        }

        let data: HeadlinesResponse = response
            .json()
            .await
            .map_err(|e| Error::News(format!("headlines payload: {e}")))?;
        Ok(Self::format_headlines(topic, &data.articles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_articles_reports_no_news() {
        assert_eq!(
            NewsSkill::format_headlines("ufos", &[]),
            "No news found for 'ufos'."
        );
    }

    #[test]
    fn headlines_render_as_bullets() {
        let articles = vec![
            Article {
                title: "First story".to_string(),
            },
            Article {
                title: "Second story".to_string(),
            },
        ];
        assert_eq!(
            NewsSkill::format_headlines("tech", &articles),
            "Here are the top headlines:\n- First story\n- Second story"
        );
    }

    #[tokio::test]
    async fn missing_key_degrades_to_friendly_reply() {
        let skill = NewsSkill::new(reqwest::Client::new(), Arc::new(KeyStore::new()));
        let reply = skill.run("anything").await.unwrap();
        assert_eq!(reply, "NewsAPI key not configured; news feature unavailable.");
    }

    #[test]
    fn response_parses_articles() {
        let raw = r#"{"status": "ok", "articles": [{"title": "Hello", "url": "https://x"}]}"#;
        let data: HeadlinesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(data.articles.len(), 1);
        assert_eq!(data.articles[0].title, "Hello");
    }
}
