//! Configuration management for the Leo gateway

pub mod file;

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::keys::Provider;
use crate::persona::Persona;
use crate::Result;

const DEFAULT_PORT: u16 = 8787;
const DEFAULT_TTS_VOICE: &str = "en-US-marcus";
const DEFAULT_TTS_FORMAT: &str = "mp3";
const DEFAULT_TEMPERATURE: f64 = 1.0;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
const DEFAULT_HISTORY_WINDOW: usize = 5;

/// Gateway configuration
#[derive(Debug)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// TTS voice configuration
    pub voice: VoiceConfig,

    /// LLM configuration
    pub llm: LlmConfig,

    /// Active persona
    pub persona: Persona,

    /// Startup API keys
    pub api_keys: ApiKeys,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Directory with the web frontend; `None` disables static serving
    pub static_dir: Option<PathBuf>,

    /// Global requests-per-minute cap; `None` disables limiting
    pub rate_limit_rpm: Option<u32>,
}

/// TTS voice configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Murf voice identifier
    pub tts_voice: String,

    /// Murf audio container
    pub tts_format: String,
}

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Reply length cap in tokens
    pub max_output_tokens: u32,

    /// How many stored messages are replayed per turn
    pub history_window: usize,
}

/// Startup API keys for external services
///
/// These only seed the runtime key store; the config panel can change keys
/// afterwards without touching this struct.
#[derive(Debug, Default)]
pub struct ApiKeys {
    pub assemblyai: Option<SecretString>,
    pub murf: Option<SecretString>,
    pub gemini: Option<SecretString>,
    pub newsapi: Option<SecretString>,
}

impl ApiKeys {
    /// Merge file-level keys with the environment; the environment wins
    fn from_sources(file: &file::ApiKeysFileConfig) -> Self {
        Self {
            assemblyai: key_from(Provider::Assemblyai, file.assemblyai.as_deref()),
            murf: key_from(Provider::Murf, file.murf.as_deref()),
            gemini: key_from(Provider::Gemini, file.gemini.as_deref()),
            newsapi: key_from(Provider::Newsapi, file.newsapi.as_deref()),
        }
    }

    /// Seed map for the runtime key store
    #[must_use]
    pub fn initial_keys(&self) -> HashMap<Provider, SecretString> {
        let mut keys = HashMap::new();
        let entries = [
            (Provider::Assemblyai, &self.assemblyai),
            (Provider::Murf, &self.murf),
            (Provider::Gemini, &self.gemini),
            (Provider::Newsapi, &self.newsapi),
        ];
        for (provider, key) in entries {
            if let Some(key) = key {
                keys.insert(provider, SecretString::from(key.expose_secret().to_owned()));
            }
        }
        keys
    }
}

/// Resolve one provider key: environment variable first, then config file
fn key_from(provider: Provider, file_value: Option<&str>) -> Option<SecretString> {
    std::env::var(provider.env_var())
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| file_value.map(ToOwned::to_owned))
        .map(SecretString::from)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(file::GatewayConfigFile::default(), None, None)
    }
}

impl Config {
    /// Load configuration: defaults ← config file ← environment ← CLI flags
    ///
    /// # Errors
    ///
    /// Currently infallible, but kept fallible for parity with future
    /// validation.
    pub fn load(port: Option<u16>, static_dir: Option<PathBuf>) -> Result<Self> {
        let config_file = file::load_config_file();
        Ok(Self::from_file(config_file, port, static_dir))
    }

    /// Assemble a config from a parsed file plus CLI overrides
    #[must_use]
    pub fn from_file(
        config_file: file::GatewayConfigFile,
        port: Option<u16>,
        static_dir: Option<PathBuf>,
    ) -> Self {
        let api_keys = ApiKeys::from_sources(&config_file.api_keys);

        let server = ServerConfig {
            port: port.or(config_file.server.port).unwrap_or(DEFAULT_PORT),
            static_dir: static_dir
                .or_else(|| config_file.server.static_dir.map(PathBuf::from))
                .or_else(|| Some(PathBuf::from("static"))),
            rate_limit_rpm: config_file.server.rate_limit_rpm,
        };

        let voice = VoiceConfig {
            tts_voice: config_file
                .voice
                .tts_voice
                .unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
            tts_format: config_file
                .voice
                .tts_format
                .unwrap_or_else(|| DEFAULT_TTS_FORMAT.to_string()),
        };

        let llm = LlmConfig {
            model: config_file
                .llm
                .model
                .unwrap_or_else(|| crate::llm::DEFAULT_MODEL.to_string()),
            temperature: config_file.llm.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_output_tokens: config_file
                .llm
                .max_output_tokens
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            history_window: config_file
                .llm
                .history_window
                .unwrap_or(DEFAULT_HISTORY_WINDOW),
        };

        let mut persona = Persona::default();
        if let Some(name) = config_file.persona.name {
            persona.name = name;
        }
        if let Some(prompt) = config_file.persona.system_prompt {
            persona.system_prompt = prompt;
        }

        Self {
            server,
            voice,
            llm,
            persona,
            api_keys,
        }
    }
}
