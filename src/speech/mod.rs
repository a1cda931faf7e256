//! Speech relays: transcription and synthesis
//!
//! Both adapters are thin pass-throughs over their provider's REST API.

mod stt;
mod tts;

pub use stt::SpeechToText;
pub use tts::{TextToSpeech, MAX_CHUNK_CHARS};
