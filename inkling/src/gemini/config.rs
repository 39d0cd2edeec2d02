//! Gemini client configuration.

use crate::error::{GenAiError, Result};

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Model used for analysis and chat.
    pub text_model: String,
    /// Model used for speech synthesis.
    pub tts_model: String,
    /// Prebuilt voice used for narration.
    pub voice: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl GeminiConfig {
    /// Default Gemini API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default text/vision model.
    pub const DEFAULT_TEXT_MODEL: &'static str = "gemini-3-pro-preview";
    /// Default speech synthesis model.
    pub const DEFAULT_TTS_MODEL: &'static str = "gemini-2.5-flash-preview-tts";
    /// Default narration voice.
    pub const DEFAULT_VOICE: &'static str = "Charon";

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            text_model: Self::DEFAULT_TEXT_MODEL.to_owned(),
            tts_model: Self::DEFAULT_TTS_MODEL.to_owned(),
            voice: Self::DEFAULT_VOICE.to_owned(),
            timeout_secs: Some(120),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `GEMINI_API_KEY` - Required API key
    /// - `GEMINI_BASE_URL` - Optional base URL
    /// - `GEMINI_TEXT_MODEL` - Optional text/vision model
    /// - `GEMINI_TTS_MODEL` - Optional speech model
    /// - `GEMINI_VOICE` - Optional narration voice
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GenAiError::auth("gemini", "GEMINI_API_KEY environment variable not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("GEMINI_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_TTS_MODEL") {
            config.tts_model = model;
        }
        if let Ok(voice) = std::env::var("GEMINI_VOICE") {
            config.voice = voice;
        }

        Ok(config)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the text/vision model.
    #[must_use]
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Sets the speech synthesis model.
    #[must_use]
    pub fn with_tts_model(mut self, model: impl Into<String>) -> Self {
        self.tts_model = model.into();
        self
    }

    /// Sets the narration voice.
    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_defaults() {
        let config = GeminiConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, GeminiConfig::DEFAULT_BASE_URL);
        assert_eq!(config.text_model, GeminiConfig::DEFAULT_TEXT_MODEL);
        assert_eq!(config.tts_model, GeminiConfig::DEFAULT_TTS_MODEL);
        assert_eq!(config.voice, GeminiConfig::DEFAULT_VOICE);
    }

    #[test]
    fn config_builder() {
        let config = GeminiConfig::new("key")
            .with_text_model("gemini-experimental")
            .with_voice("Kore")
            .with_timeout(30);

        assert_eq!(config.text_model, "gemini-experimental");
        assert_eq!(config.voice, "Kore");
        assert_eq!(config.timeout_secs, Some(30));
    }
}
