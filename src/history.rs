//! Per-session conversation history
//!
//! Transcripts are kept in memory only; restarting the gateway clears them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Speaker of a chat turn, using the LLM wire vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Role string as sent to Gemini
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// A single stored chat turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped now
    #[must_use]
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// In-memory transcript store keyed by session id
#[derive(Default)]
pub struct HistoryStore {
    sessions: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl HistoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to a session, creating the session if needed
    pub async fn append(&self, session_id: &str, role: Role, text: impl Into<String>) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(ChatMessage::new(role, text));
    }

    /// The most recent `limit` messages of a session, oldest first
    pub async fn recent(&self, session_id: &str, limit: usize) -> Vec<ChatMessage> {
        let sessions = self.sessions.read().await;
        let Some(messages) = sessions.get(session_id) else {
            return Vec::new();
        };
        let start = messages.len().saturating_sub(limit);
        messages[start..].to_vec()
    }

    /// The full transcript of a session, oldest first
    pub async fn transcript(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop a session's transcript, returning whether it existed
    pub async fn clear(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_preserves_order() {
        let store = HistoryStore::new();
        store.append("s1", Role::User, "hello").await;
        store.append("s1", Role::Model, "hi there").await;
        store.append("s1", Role::User, "how are you").await;

        let transcript = store.transcript("s1").await;
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].text, "hello");
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[1].role, Role::Model);
        assert_eq!(transcript[2].text, "how are you");
    }

    #[tokio::test]
    async fn recent_returns_trailing_window() {
        let store = HistoryStore::new();
        for i in 0..8 {
            store.append("s1", Role::User, format!("turn {i}")).await;
        }

        let window = store.recent("s1", 5).await;
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].text, "turn 3");
        assert_eq!(window[4].text, "turn 7");
    }

    #[tokio::test]
    async fn recent_with_large_limit_returns_all() {
        let store = HistoryStore::new();
        store.append("s1", Role::User, "only turn").await;
        assert_eq!(store.recent("s1", 5).await.len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = HistoryStore::new();
        store.append("a", Role::User, "for a").await;
        store.append("b", Role::User, "for b").await;
        assert_eq!(store.transcript("a").await.len(), 1);
        assert_eq!(store.transcript("b").await.len(), 1);
        assert!(store.transcript("c").await.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_session() {
        let store = HistoryStore::new();
        store.append("s1", Role::User, "hello").await;
        assert!(store.clear("s1").await);
        assert!(store.transcript("s1").await.is_empty());
        assert!(!store.clear("s1").await);
        assert!(!store.clear("never-existed").await);
    }
}
