//! Inkling - an image-to-story creative client
//!
//! This crate turns an image into an atmospheric opening passage and a
//! technical analysis via a generative API, supports follow-up questions
//! about the story world, and narrates the passage as synthesized speech.

pub mod audio;
pub mod chat;
pub mod error;
pub mod gemini;
pub mod image;
pub mod message;
pub mod playback;
pub mod prelude;
pub mod session;
pub mod story;

pub use error::{AudioError, Error, GenAiError, Result};
