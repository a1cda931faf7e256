//! TOML configuration file loading
//!
//! Supports `~/.config/leo/gateway/config.toml` as a persistent config
//! source. All fields are optional — the file is a partial overlay on top of
//! defaults, and the environment wins over the file for API keys.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct GatewayConfigFile {
    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Voice synthesis configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Persona overrides
    #[serde(default)]
    pub persona: PersonaFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,

    /// Directory with the web frontend
    pub static_dir: Option<String>,

    /// Global requests-per-minute cap; absent disables limiting
    pub rate_limit_rpm: Option<u32>,
}

/// Voice synthesis configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Murf voice identifier (e.g. "en-US-marcus")
    pub tts_voice: Option<String>,

    /// Murf audio container (e.g. "mp3")
    pub tts_format: Option<String>,
}

/// LLM-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f64>,

    /// Reply length cap in tokens
    pub max_output_tokens: Option<u32>,

    /// How many stored messages are replayed per turn
    pub history_window: Option<usize>,
}

/// Persona overrides
#[derive(Debug, Default, Deserialize)]
pub struct PersonaFileConfig {
    pub name: Option<String>,
    pub system_prompt: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub assemblyai: Option<String>,
    pub murf: Option<String>,
    pub gemini: Option<String>,
    pub newsapi: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `GatewayConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file() -> GatewayConfigFile {
    let Some(path) = config_file_path() else {
        return GatewayConfigFile::default();
    };
    load_from_path(&path)
}

/// Load a config file from an explicit path, defaulting on any failure
#[must_use]
pub fn load_from_path(path: &Path) -> GatewayConfigFile {
    if !path.exists() {
        return GatewayConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                GatewayConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            GatewayConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/leo/gateway/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| {
        d.config_dir()
            .join("leo")
            .join("gateway")
            .join("config.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn full_file_parses() {
        let raw = r#"
            [server]
            port = 9000
            rate_limit_rpm = 120

            [voice]
            tts_voice = "en-UK-ruby"

            [llm]
            model = "gemini-2.5-pro"
            history_window = 10

            [persona]
            name = "Ada"

            [api_keys]
            gemini = "g-key"
        "#;

        let config: GatewayConfigFile = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, Some(9000));
        assert_eq!(config.server.rate_limit_rpm, Some(120));
        assert_eq!(config.voice.tts_voice.as_deref(), Some("en-UK-ruby"));
        assert_eq!(config.llm.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.llm.history_window, Some(10));
        assert_eq!(config.persona.name.as_deref(), Some("Ada"));
        assert_eq!(config.api_keys.gemini.as_deref(), Some("g-key"));
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let config: GatewayConfigFile = toml::from_str("").unwrap();
        assert!(config.server.port.is_none());
        assert!(config.api_keys.assemblyai.is_none());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = load_from_path(Path::new("/definitely/not/here.toml"));
        assert!(config.server.port.is_none());
    }

    #[test]
    fn malformed_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "this is not toml [[[").unwrap();

        let config = load_from_path(&path);
        assert!(config.server.port.is_none());
    }
}
