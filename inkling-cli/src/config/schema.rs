//! Configuration schema definitions.

use inkling::gemini::GeminiConfig;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Generative service configuration.
    #[serde(default)]
    pub provider: ProviderSection,

    /// Narration configuration.
    #[serde(default)]
    pub narration: NarrationSection,
}

/// Generative service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    /// API key. Falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Model used for story generation and chat.
    #[serde(default)]
    pub text_model: Option<String>,

    /// Model used for speech synthesis.
    #[serde(default)]
    pub tts_model: Option<String>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Narration configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrationSection {
    /// Prebuilt voice name.
    #[serde(default)]
    pub voice: Option<String>,
}

impl AppConfig {
    /// Build a service configuration, falling back to `GEMINI_API_KEY` for
    /// the key. Returns `None` when no key is available anywhere.
    #[must_use]
    pub fn to_gemini_config(&self) -> Option<GeminiConfig> {
        let api_key = self
            .provider
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())?;

        let mut config = GeminiConfig::new(api_key);
        if let Some(base) = &self.provider.api_base {
            config = config.with_base_url(base);
        }
        if let Some(model) = &self.provider.text_model {
            config = config.with_text_model(model);
        }
        if let Some(model) = &self.provider.tts_model {
            config = config.with_tts_model(model);
        }
        if let Some(secs) = self.provider.timeout_secs {
            config = config.with_timeout(secs);
        }
        if let Some(voice) = &self.narration.voice {
            config = config.with_voice(voice);
        }

        Some(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses_to_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.provider.api_key.is_none());
        assert!(config.narration.voice.is_none());
    }

    #[test]
    fn overrides_flow_into_service_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [provider]
            api_key = "k"
            text_model = "gemini-experimental"
            timeout_secs = 30

            [narration]
            voice = "Kore"
            "#,
        )
        .unwrap();

        let service = config.to_gemini_config().unwrap();
        assert_eq!(service.api_key, "k");
        assert_eq!(service.text_model, "gemini-experimental");
        assert_eq!(service.voice, "Kore");
        assert_eq!(service.timeout_secs, Some(30));
    }

    #[test]
    fn unknown_top_level_key_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("[bogus]\nx = 1\n");
        assert!(result.is_err());
    }
}
