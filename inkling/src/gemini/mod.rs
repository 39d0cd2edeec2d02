//! Gemini API client implementation.
//!
//! This module provides a client for the Gemini generateContent API,
//! supporting:
//! - Image analysis with story generation
//! - Conversational chat
//! - Speech synthesis (narration)

mod chat;
mod client;
mod config;
mod speech;
mod story;
mod types;

pub use client::Gemini;
pub use config::GeminiConfig;
