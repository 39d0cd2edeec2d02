//! Gemini speech synthesis implementation.

use async_trait::async_trait;

use crate::audio::{NARRATION_CHANNELS, NARRATION_SAMPLE_RATE, NarrationProvider, SpeechClip};
use crate::error::Result;

use super::client::Gemini;
use super::types::{GenerateContentRequest, GenerationConfig, WireContent, WirePart};

/// Fixed instruction wrapping the story text for narration.
pub(crate) fn narration_prompt(text: &str) -> String {
    format!("Read this story paragraph with deep emotion and atmosphere: {text}")
}

#[async_trait]
impl NarrationProvider for Gemini {
    async fn narrate(&self, text: &str) -> Result<Option<SpeechClip>> {
        let body = GenerateContentRequest {
            contents: vec![WireContent::user(vec![WirePart::text(narration_prompt(
                text,
            ))])],
            system_instruction: None,
            generation_config: Some(GenerationConfig::audio(&self.config.voice)),
        };

        let response = self.generate(&self.config.tts_model, &body).await?;

        // Missing audio at any nesting level means "no narration available",
        // not an error.
        Ok(response.inline_data().map(|inline| SpeechClip {
            data: inline.data.clone(),
            mime_type: Some(inline.mime_type.clone()),
            sample_rate: NARRATION_SAMPLE_RATE,
            channels: NARRATION_CHANNELS,
        }))
    }
}
