//! Gemini wire format types.
//!
//! Only the fields this client reads or writes are modeled; everything else
//! in the service's responses is ignored rather than validated.

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};

/// A `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents, oldest first.
    pub contents: Vec<WireContent>,
    /// Optional system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<WireContent>,
    /// Optional generation configuration (modalities, speech).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A content block: a role plus an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContent {
    /// "user" or "model"; omitted for system instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The content parts.
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

impl WireContent {
    /// A user content block.
    #[must_use]
    pub fn user(parts: Vec<WirePart>) -> Self {
        Self {
            role: Some(Role::User.as_str().to_owned()),
            parts,
        }
    }

    /// A role-less content block (system instructions).
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![WirePart::text(text)],
        }
    }

    /// Convert a transcript turn into a wire content block.
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        Self {
            role: Some(message.role.as_str().to_owned()),
            parts: vec![WirePart::text(message.text.clone())],
        }
    }
}

/// A single content part: text or inline binary data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    /// Text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary payload (base64).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl WirePart {
    /// A text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline data part.
    #[must_use]
    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Inline base64 binary data with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Declared MIME type (e.g. "image/jpeg", "audio/L16;rate=24000").
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Generation configuration for modality and speech selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested response modalities (e.g. `["AUDIO"]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    /// Speech synthesis configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

impl GenerationConfig {
    /// Configuration requesting audio output with a prebuilt voice.
    #[must_use]
    pub fn audio(voice: impl Into<String>) -> Self {
        Self {
            response_modalities: Some(vec!["AUDIO".to_owned()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.into(),
                    },
                },
            }),
        }
    }
}

/// Speech synthesis configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Voice selection.
    pub voice_config: VoiceConfig,
}

/// Voice selection wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Prebuilt voice selection.
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

/// A service-provided prebuilt voice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    /// Voice name (e.g. "Charon").
    pub voice_name: String,
}

/// A `generateContent` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; only the first is consumed.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any text is present.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// Finish reason of the first candidate, if reported.
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Inline data of the first part of the first candidate, if present at
    /// every level of nesting.
    #[must_use]
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .inline_data
            .as_ref()
    }
}

/// A single response candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content, absent for blocked candidates.
    #[serde(default)]
    pub content: Option<WireContent>,
    /// Why generation stopped, if reported.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Service error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorResponse {
    /// The error details.
    pub error: GeminiErrorBody,
}

/// Service error details.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorBody {
    /// Numeric error code.
    #[serde(default)]
    pub code: Option<i64>,
    /// Human-readable message.
    pub message: String,
    /// Symbolic status (e.g. "INVALID_ARGUMENT").
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod request_serialization {
        use super::*;

        #[test]
        fn camel_case_field_names() {
            let request = GenerateContentRequest {
                contents: vec![WireContent::user(vec![
                    WirePart::inline("image/jpeg", "aGk="),
                    WirePart::text("describe"),
                ])],
                system_instruction: Some(WireContent::system("be brief")),
                generation_config: None,
            };

            let json = serde_json::to_value(&request).unwrap();
            assert_eq!(json["contents"][0]["role"], "user");
            assert_eq!(
                json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
                "image/jpeg"
            );
            assert_eq!(json["contents"][0]["parts"][1]["text"], "describe");
            assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        }

        #[test]
        fn skips_absent_optionals() {
            let request = GenerateContentRequest {
                contents: vec![WireContent::user(vec![WirePart::text("hi")])],
                system_instruction: None,
                generation_config: None,
            };

            let json = serde_json::to_string(&request).unwrap();
            assert!(!json.contains("systemInstruction"));
            assert!(!json.contains("generationConfig"));
            assert!(!json.contains("inlineData"));
        }

        #[test]
        fn audio_generation_config() {
            let config = GenerationConfig::audio("Charon");
            let json = serde_json::to_value(&config).unwrap();

            assert_eq!(json["responseModalities"][0], "AUDIO");
            assert_eq!(
                json["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
                "Charon"
            );
        }
    }

    mod response_parsing {
        use super::*;

        #[test]
        fn extracts_text() {
            let body = r#"{
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "A story."}, {"text": "---More."}]
                    },
                    "finishReason": "STOP"
                }]
            }"#;

            let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.text().unwrap(), "A story.---More.");
        }

        #[test]
        fn extracts_inline_audio() {
            let body = r#"{
                "candidates": [{
                    "content": {
                        "parts": [{"inlineData": {"mimeType": "audio/L16;rate=24000", "data": "AAA="}}]
                    }
                }]
            }"#;

            let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
            let inline = response.inline_data().unwrap();
            assert_eq!(inline.data, "AAA=");
            assert!(inline.mime_type.starts_with("audio/"));
        }

        #[test]
        fn absent_fields_yield_none() {
            for body in [
                r"{}",
                r#"{"candidates": []}"#,
                r#"{"candidates": [{}]}"#,
                r#"{"candidates": [{"content": {"parts": []}}]}"#,
                r#"{"candidates": [{"content": {"parts": [{"text": "no audio"}]}}]}"#,
            ] {
                let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
                assert!(response.inline_data().is_none(), "body: {body}");
            }
        }

        #[test]
        fn reports_finish_reason() {
            let body = r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "truncat"}]},
                    "finishReason": "MAX_TOKENS"
                }]
            }"#;

            let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.finish_reason(), Some("MAX_TOKENS"));

            let empty: GenerateContentResponse = serde_json::from_str(r"{}").unwrap();
            assert_eq!(empty.finish_reason(), None);
        }

        #[test]
        fn ignores_unknown_fields() {
            let body = r#"{
                "candidates": [{"content": {"parts": [{"text": "ok"}]}, "index": 0}],
                "usageMetadata": {"totalTokenCount": 42},
                "modelVersion": "gemini-3-pro-preview"
            }"#;

            let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.text().unwrap(), "ok");
        }

        #[test]
        fn parses_error_body() {
            let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
            let parsed: GeminiErrorResponse = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.error.code, Some(429));
            assert_eq!(parsed.error.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
        }
    }
}
