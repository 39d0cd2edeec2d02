//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use inkling::prelude::*;
//! ```

pub use crate::audio::{NarrationProvider, PcmBuffer, SpeechClip, decode_base64};
pub use crate::chat::ChatProvider;
pub use crate::error::{AudioError, Error, GenAiError, Result};
pub use crate::gemini::{Gemini, GeminiConfig};
pub use crate::image::{ImageData, ImageFormat};
pub use crate::message::{Message, Role};
pub use crate::playback::{AudioSink, NullSink, PlaybackHandle};
pub use crate::session::{StorySession, StoryState};
pub use crate::story::{StoryParts, StoryProvider};

#[cfg(feature = "playback")]
pub use crate::playback::RodioSink;
