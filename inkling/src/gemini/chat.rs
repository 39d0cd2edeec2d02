//! Gemini conversational turn implementation.

use async_trait::async_trait;

use crate::chat::{CHAT_SYSTEM_PROMPT, ChatProvider};
use crate::error::{GenAiError, Result};
use crate::message::Message;

use super::client::{Gemini, PROVIDER};
use super::types::{GenerateContentRequest, WireContent, WirePart};

#[async_trait]
impl ChatProvider for Gemini {
    async fn chat(&self, history: &[Message], message: &str) -> Result<String> {
        let mut contents: Vec<WireContent> =
            history.iter().map(WireContent::from_message).collect();
        contents.push(WireContent::user(vec![WirePart::text(message)]));

        let body = GenerateContentRequest {
            contents,
            system_instruction: Some(WireContent::system(CHAT_SYSTEM_PROMPT)),
            generation_config: None,
        };

        let response = self.generate(&self.config.text_model, &body).await?;

        response.text().ok_or_else(|| {
            GenAiError::response_format("text response", "no candidates or empty content").into()
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
