//! Gemini analyze-and-write implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::image::ImageData;
use crate::story::{STORY_PROMPT, StoryParts, StoryProvider};

use super::client::Gemini;
use super::types::{GenerateContentRequest, WireContent, WirePart};

#[async_trait]
impl StoryProvider for Gemini {
    async fn analyze_and_write(&self, image: &ImageData) -> Result<StoryParts> {
        let body = GenerateContentRequest {
            contents: vec![WireContent::user(vec![
                WirePart::inline(image.mime_type(), image.base64_data()),
                WirePart::text(STORY_PROMPT),
            ])],
            system_instruction: None,
            generation_config: None,
        };

        let response = self.generate(&self.config.text_model, &body).await?;

        // A response with no text at all still yields a result: both sides
        // fall back to their fixed strings.
        let text = response.text().unwrap_or_default();
        Ok(StoryParts::from_response(&text))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::image::ImageFormat;

    #[test]
    fn request_body_shape() {
        let image = ImageData::from_base64("aGVsbG8=", ImageFormat::Jpeg);
        let body = GenerateContentRequest {
            contents: vec![WireContent::user(vec![
                WirePart::inline(image.mime_type(), image.base64_data()),
                WirePart::text(STORY_PROMPT),
            ])],
            system_instruction: None,
            generation_config: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert!(
            parts[1]["text"]
                .as_str()
                .unwrap()
                .contains("atmospheric opening paragraph")
        );
    }
}
