//! Leo Gateway - browser voice assistant relay
//!
//! A thin backend between a recording web page and the third-party services
//! that do the actual work:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Browser                          │
//! │    recorder  │  chat panel  │  config panel         │
//! └────────────────────┬────────────────────────────────┘
//!                      │ audio / text / keys
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Leo Gateway                         │
//! │   agent pipeline  │  skills  │  key store           │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │   AssemblyAI  │  Gemini  │  Murf AI  │  NewsAPI    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Every request is one round trip: browser → gateway → external API →
//! gateway → browser. The only cross-request state is the in-memory chat
//! transcript and the key store behind the config panel.

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod keys;
pub mod llm;
pub mod persona;
pub mod skills;
pub mod speech;

pub use config::Config;
pub use error::{Error, Result};
pub use history::{ChatMessage, HistoryStore, Role};
pub use keys::{KeyStore, Provider};
pub use llm::ChatModel;
pub use persona::Persona;
pub use skills::{NewsSkill, Skill, SkillRegistry, WebSearchSkill};
pub use speech::{SpeechToText, TextToSpeech};
