//! Gemini API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::{GenAiError, Result};

use super::config::GeminiConfig;
use super::types::{GenerateContentRequest, GenerateContentResponse, GeminiErrorResponse};

/// Provider name used in error reporting.
pub(crate) const PROVIDER: &str = "gemini";

/// Gemini API client.
///
/// Cheap to clone; the configuration and connection pool are shared.
#[derive(Debug, Clone)]
pub struct Gemini {
    pub(crate) config: Arc<GeminiConfig>,
    pub(crate) client: Client,
}

impl Gemini {
    /// Create a new Gemini client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be
    /// constructed.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(GenAiError::auth(PROVIDER, "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| GenAiError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the text/vision model.
    #[must_use]
    pub fn text_model(&self) -> &str {
        &self.config.text_model
    }

    /// Get the speech synthesis model.
    #[must_use]
    pub fn tts_model(&self) -> &str {
        &self.config.tts_model
    }

    /// Build the generateContent URL for a model.
    pub(crate) fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.base_url)
    }

    /// Issue a generateContent request and parse the response.
    ///
    /// Single exchange: no retries, no caching, no response validation
    /// beyond the fields the caller reads.
    pub(crate) async fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.generate_url(model);
        tracing::debug!(model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(GenAiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response.text().await.map_err(GenAiError::from)?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                GenAiError::response_format(
                    "valid generateContent response",
                    format!("parse error: {e}, response: {response_text}"),
                )
            })?;

        if let Some(reason) = parsed.finish_reason()
            && reason != "STOP"
        {
            tracing::warn!(reason, model, "generation stopped early");
        }

        Ok(parsed)
    }

    /// Parse an error response from the service.
    pub(crate) fn parse_error(status: u16, body: &str) -> GenAiError {
        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            let error = error_response.error;
            let code = error
                .status
                .or_else(|| error.code.map(|c| c.to_string()))
                .unwrap_or_else(|| status.to_string());

            return match status {
                401 | 403 => GenAiError::auth(PROVIDER, error.message),
                429 => GenAiError::rate_limited(PROVIDER),
                _ => GenAiError::provider_code(PROVIDER, code, error.message),
            };
        }

        GenAiError::http_status(status, body.to_owned())
    }
}
