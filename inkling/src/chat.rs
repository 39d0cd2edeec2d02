//! Chat contract: the conversational-turn provider trait and fallbacks.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// System instruction establishing the assistant's persona.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a creative writing assistant. You help the user expand on the story world based on the provided image and opening paragraph. Be imaginative but consistent with the established mood.";

/// Fixed reply substituted when a chat exchange fails for any reason.
///
/// The underlying cause is logged, never surfaced to the transcript.
pub const CHAT_FALLBACK: &str = "Sorry, I hit a snag thinking about that.";

/// Provider of single conversational exchanges.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send prior turns plus a new user message; returns the model's reply.
    async fn chat(&self, history: &[Message], message: &str) -> Result<String>;

    /// Name of the backing provider, for diagnostics.
    fn provider_name(&self) -> &'static str;
}
