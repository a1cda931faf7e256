//! Runtime key store backing the config panel
//!
//! Keys live in memory only: seeded from the environment or config file at
//! startup, mutable through the keys API while the gateway runs, gone on
//! restart. Clients resolve keys at request time, so a key entered in the
//! panel takes effect immediately.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// External services that require an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Assemblyai,
    Murf,
    Gemini,
    Newsapi,
}

impl Provider {
    /// All providers, in config-panel display order
    pub const ALL: [Self; 4] = [Self::Assemblyai, Self::Murf, Self::Gemini, Self::Newsapi];

    /// Identifier used in URLs and logs
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Assemblyai => "assemblyai",
            Self::Murf => "murf",
            Self::Gemini => "gemini",
            Self::Newsapi => "newsapi",
        }
    }

    /// Display name for UI-facing responses and errors
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Assemblyai => "AssemblyAI",
            Self::Murf => "Murf AI",
            Self::Gemini => "Gemini",
            Self::Newsapi => "NewsAPI",
        }
    }

    /// What the key is used for, shown in the config panel
    #[must_use]
    pub fn purpose(self) -> &'static str {
        match self {
            Self::Assemblyai => "Speech-to-text",
            Self::Murf => "Text-to-speech",
            Self::Gemini => "Chat completion",
            Self::Newsapi => "News headlines",
        }
    }

    /// Environment variable consulted at startup
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Assemblyai => "ASSEMBLYAI_API_KEY",
            Self::Murf => "MURF_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Newsapi => "NEWSAPI_KEY",
        }
    }
}

/// In-memory store for panel-entered provider keys
#[derive(Default)]
pub struct KeyStore {
    keys: RwLock<HashMap<Provider, SecretString>>,
}

impl KeyStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with startup keys
    #[must_use]
    pub fn with_keys(initial: HashMap<Provider, SecretString>) -> Self {
        Self {
            keys: RwLock::new(initial),
        }
    }

    /// Resolve the key for a provider, or `None` if not configured
    pub async fn get(&self, provider: Provider) -> Option<String> {
        self.keys
            .read()
            .await
            .get(&provider)
            .map(|k| k.expose_secret().to_owned())
    }

    /// Whether a key is present for the provider
    pub async fn is_configured(&self, provider: Provider) -> bool {
        self.keys.read().await.contains_key(&provider)
    }

    /// Insert or replace the key for a provider
    pub async fn set(&self, provider: Provider, key: String) {
        self.keys.write().await.insert(provider, SecretString::from(key));
    }

    /// Remove the stored key, returning whether one was present
    pub async fn remove(&self, provider: Provider) -> bool {
        self.keys.write().await.remove(&provider).is_some()
    }

    /// All providers that currently have a key
    pub async fn configured(&self) -> Vec<Provider> {
        let keys = self.keys.read().await;
        Provider::ALL
            .into_iter()
            .filter(|p| keys.contains_key(p))
            .collect()
    }

    /// Masked preview of a stored key for the config panel
    ///
    /// Never returns the full key.
    pub async fn preview(&self, provider: Provider) -> Option<String> {
        self.keys
            .read()
            .await
            .get(&provider)
            .map(|k| mask(k.expose_secret()))
    }
}

/// Keep only the last four characters visible
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "••••".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("••••{tail}")
}
